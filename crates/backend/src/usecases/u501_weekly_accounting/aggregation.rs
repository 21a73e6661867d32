//! Свёртка строк заказов недели в строки продаж по продавцам.

use contracts::domain::a004_marketplace_order::aggregate::OrderLine;
use contracts::projections::p900_weekly_accounting::dto::{CategoryStat, ShopSale};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::projections::p900_weekly_accounting::repository::ReportTotals;

const UNCATEGORIZED: &str = "other";

/// Денежные суммы храним с точностью до копейки
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Default)]
struct SellerAcc {
    seller_name: String,
    revenue: f64,
    commission: f64,
    quantity: i64,
    orders: HashSet<String>,
    categories: BTreeMap<String, CategoryStat>,
}

/// Строки продаж и итоги недели.
///
/// Учитываются только строки со статусом, который `counts_as_sale`.
/// Название продавца берётся из справочника магазинов, если оно там есть.
pub fn aggregate(
    week_id: &str,
    lines: &[OrderLine],
    shop_names: &HashMap<String, String>,
) -> (Vec<ShopSale>, ReportTotals) {
    let mut by_seller: HashMap<&str, SellerAcc> = HashMap::new();
    let mut all_orders: HashSet<&str> = HashSet::new();

    for line in lines.iter().filter(|l| l.status.counts_as_sale()) {
        let acc = by_seller.entry(line.seller_id.as_str()).or_default();
        if acc.seller_name.is_empty() {
            acc.seller_name = line.seller_name.clone();
        }
        let revenue = line.revenue();
        acc.revenue += revenue;
        acc.commission += line.commission();
        acc.quantity += line.quantity;
        acc.orders.insert(line.order_id.clone());

        let category = line.category.as_deref().unwrap_or(UNCATEGORIZED);
        let stat = acc.categories.entry(category.to_string()).or_default();
        stat.revenue += revenue;
        stat.quantity += line.quantity;

        all_orders.insert(line.order_id.as_str());
    }

    let mut sales: Vec<ShopSale> = by_seller
        .into_iter()
        .map(|(seller_id, acc)| {
            let revenue = round2(acc.revenue);
            let commission = round2(acc.commission);
            let seller_name = shop_names
                .get(seller_id)
                .cloned()
                .unwrap_or(acc.seller_name);
            let category_breakdown = acc
                .categories
                .into_iter()
                .map(|(k, v)| {
                    (
                        k,
                        CategoryStat {
                            revenue: round2(v.revenue),
                            quantity: v.quantity,
                        },
                    )
                })
                .collect();
            ShopSale {
                week_id: week_id.to_string(),
                seller_id: seller_id.to_string(),
                seller_name,
                revenue,
                quantity: acc.quantity,
                commission,
                net: round2(revenue - commission),
                order_count: acc.orders.len() as i64,
                category_breakdown,
            }
        })
        .collect();

    sales.sort_by(|a, b| {
        b.revenue
            .partial_cmp(&a.revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.seller_id.cmp(&b.seller_id))
    });

    let totals = ReportTotals {
        total_revenue: round2(sales.iter().map(|s| s.revenue).sum()),
        total_commission: round2(sales.iter().map(|s| s.commission).sum()),
        total_orders: all_orders.len() as i64,
        total_quantity: sales.iter().map(|s| s.quantity).sum(),
        seller_count: sales.len() as i64,
    };

    (sales, totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use contracts::domain::a004_marketplace_order::aggregate::{OrderLineDto, OrderLineStatus};

    fn line(
        order_id: &str,
        seller_id: &str,
        category: Option<&str>,
        price: f64,
        quantity: i64,
        status: OrderLineStatus,
    ) -> OrderLine {
        OrderLine::new_for_insert(&OrderLineDto {
            order_id: order_id.into(),
            seller_id: seller_id.into(),
            seller_name: format!("Seller {}", seller_id),
            product_id: "p".into(),
            product_name: "Product".into(),
            category: category.map(String::from),
            quantity,
            unit_price: price,
            commission_rate: 0.1,
            status,
            ordered_at: Utc.with_ymd_and_hms(2025, 1, 7, 10, 0, 0).unwrap(),
        })
    }

    #[test]
    fn test_aggregate_per_seller() {
        let lines = vec![
            line("o-1", "s-1", Some("home"), 100.0, 2, OrderLineStatus::Delivered),
            line("o-1", "s-1", Some("fashion"), 50.0, 1, OrderLineStatus::Pending),
            line("o-2", "s-1", None, 10.0, 1, OrderLineStatus::Delivered),
            line("o-3", "s-2", Some("home"), 500.0, 1, OrderLineStatus::Delivered),
            line("o-4", "s-2", Some("home"), 999.0, 1, OrderLineStatus::Cancelled),
            line("o-5", "s-3", Some("home"), 999.0, 1, OrderLineStatus::Returned),
        ];
        let mut names = HashMap::new();
        names.insert("s-2".to_string(), "Bosphorus Home".to_string());

        let (sales, totals) = aggregate("2025-01-06", &lines, &names);

        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].seller_id, "s-2");
        assert_eq!(sales[0].seller_name, "Bosphorus Home");
        assert_eq!(sales[0].revenue, 500.0);
        assert_eq!(sales[0].order_count, 1);

        let s1 = &sales[1];
        assert_eq!(s1.seller_name, "Seller s-1");
        assert_eq!(s1.revenue, 260.0);
        assert_eq!(s1.quantity, 4);
        assert_eq!(s1.commission, 26.0);
        assert_eq!(s1.net, 234.0);
        assert_eq!(s1.order_count, 2);
        assert_eq!(s1.category_breakdown["home"].revenue, 200.0);
        assert_eq!(s1.category_breakdown["fashion"].quantity, 1);
        assert_eq!(s1.category_breakdown[UNCATEGORIZED].revenue, 10.0);

        assert_eq!(totals.total_revenue, 760.0);
        assert_eq!(totals.total_commission, 76.0);
        assert_eq!(totals.total_orders, 3);
        assert_eq!(totals.total_quantity, 5);
        assert_eq!(totals.seller_count, 2);
    }

    #[test]
    fn test_ties_sorted_by_seller_id() {
        let lines = vec![
            line("o-1", "s-b", None, 100.0, 1, OrderLineStatus::Delivered),
            line("o-2", "s-a", None, 100.0, 1, OrderLineStatus::Delivered),
        ];
        let (sales, _) = aggregate("2025-01-06", &lines, &HashMap::new());
        let ids: Vec<&str> = sales.iter().map(|s| s.seller_id.as_str()).collect();
        assert_eq!(ids, vec!["s-a", "s-b"]);
    }

    #[test]
    fn test_empty_week() {
        let (sales, totals) = aggregate("2025-01-06", &[], &HashMap::new());
        assert!(sales.is_empty());
        assert_eq!(totals, ReportTotals::default());
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round2(0.1 + 0.2), 0.3);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(-3.456), -3.46);
    }
}
