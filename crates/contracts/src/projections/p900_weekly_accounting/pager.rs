//! Состояние постраничной загрузки продаж отчёта на клиенте.
//!
//! Страницы только дописываются в конец. Смена сортировки сбрасывает
//! курсор и уже загруженные строки.

use super::dto::{SaleSortField, SalesPage, SalesPageQuery, ShopSale, WeeklyReport, PAGE_SIZE};
use crate::shared::search::filter_by_search;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesPager {
    pub sort: SaleSortField,
    pub items: Vec<ShopSale>,
    pub cursor: Option<String>,
    pub has_more: bool,
    /// Загружена ли хотя бы одна страница с текущей сортировкой
    pub loaded: bool,
}

impl SalesPager {
    pub fn new(sort: SaleSortField) -> Self {
        Self {
            sort,
            ..Default::default()
        }
    }

    /// Меняет сортировку. Возвращает `true`, если нужно грузить первую страницу заново.
    pub fn set_sort(&mut self, field: SaleSortField) -> bool {
        if field == self.sort && self.loaded {
            return false;
        }
        self.sort = field;
        self.reset();
        true
    }

    /// Сбрасывает страницы, сохраняя сортировку
    pub fn reset(&mut self) {
        self.items.clear();
        self.cursor = None;
        self.has_more = false;
        self.loaded = false;
    }

    /// Дописывает страницу и продвигает курсор
    pub fn apply_page(&mut self, page: SalesPage) {
        self.items.extend(page.items);
        self.cursor = page.next_cursor;
        self.has_more = page.has_more && self.cursor.is_some();
        self.loaded = true;
    }

    pub fn can_load_more(&self) -> bool {
        !self.loaded || self.has_more
    }

    /// Параметры запроса следующей страницы, `None` если всё загружено
    pub fn next_query(&self) -> Option<SalesPageQuery> {
        if !self.can_load_more() {
            return None;
        }
        Some(SalesPageQuery {
            sort_by: Some(self.sort.as_str().to_string()),
            limit: Some(PAGE_SIZE),
            after: if self.loaded { self.cursor.clone() } else { None },
        })
    }

    /// Строки, видимые с учётом поиска. Только по уже загруженным данным.
    pub fn visible(&self, search: &str) -> Vec<ShopSale> {
        filter_by_search(&self.items, search)
    }
}

/// Загруженные продажи устарели: отчёт пересчитан или сменил статус.
/// Первая загрузка отчёта (`previous == None`) сброса не требует.
pub fn sales_outdated(previous: Option<&WeeklyReport>, next: &WeeklyReport) -> bool {
    previous.is_some_and(|prev| {
        prev.status != next.status || prev.calculated_at != next.calculated_at
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sale(seller_id: &str, name: &str, revenue: f64) -> ShopSale {
        ShopSale {
            week_id: "2025-01-06".into(),
            seller_id: seller_id.into(),
            seller_name: name.into(),
            revenue,
            quantity: 1,
            commission: revenue * 0.1,
            net: revenue * 0.9,
            order_count: 1,
            category_breakdown: BTreeMap::new(),
        }
    }

    fn page(ids: &[(&str, &str)], has_more: bool) -> SalesPage {
        let items: Vec<ShopSale> = ids.iter().map(|(id, n)| sale(id, n, 100.0)).collect();
        SalesPage {
            next_cursor: items.last().map(|s| s.seller_id.clone()),
            items,
            has_more,
        }
    }

    #[test]
    fn test_first_query_has_no_cursor() {
        let pager = SalesPager::new(SaleSortField::Revenue);
        let q = pager.next_query().unwrap();
        assert_eq!(q.sort_by.as_deref(), Some("revenue"));
        assert_eq!(q.limit, Some(20));
        assert!(q.after.is_none());
    }

    #[test]
    fn test_pages_append() {
        let mut pager = SalesPager::new(SaleSortField::Revenue);
        pager.apply_page(page(&[("s-1", "A"), ("s-2", "B")], true));
        assert_eq!(pager.next_query().unwrap().after.as_deref(), Some("s-2"));

        pager.apply_page(page(&[("s-3", "C")], false));
        let ids: Vec<&str> = pager.items.iter().map(|s| s.seller_id.as_str()).collect();
        assert_eq!(ids, vec!["s-1", "s-2", "s-3"]);
        assert!(!pager.can_load_more());
        assert!(pager.next_query().is_none());
    }

    #[test]
    fn test_sort_change_resets() {
        let mut pager = SalesPager::new(SaleSortField::Revenue);
        pager.apply_page(page(&[("s-1", "A")], true));

        assert!(!pager.set_sort(SaleSortField::Revenue));
        assert_eq!(pager.items.len(), 1);

        assert!(pager.set_sort(SaleSortField::Net));
        assert!(pager.items.is_empty());
        assert!(pager.cursor.is_none());
        let q = pager.next_query().unwrap();
        assert_eq!(q.sort_by.as_deref(), Some("net"));
        assert!(q.after.is_none());
    }

    #[test]
    fn test_has_more_without_cursor_stops() {
        let mut pager = SalesPager::default();
        pager.apply_page(SalesPage {
            items: vec![],
            next_cursor: None,
            has_more: true,
        });
        assert!(!pager.can_load_more());
    }

    #[test]
    fn test_visible_filters_loaded_rows_only() {
        let mut pager = SalesPager::default();
        pager.apply_page(page(&[("s-1", "Bosphorus Home"), ("s-2", "Anadolu")], true));
        assert_eq!(pager.visible("").len(), 2);
        let found = pager.visible("bosph");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].seller_id, "s-1");
        assert_eq!(pager.items.len(), 2);
    }

    #[test]
    fn test_recalculated_report_outdates_sales() {
        use crate::projections::p900_weekly_accounting::dto::ReportStatus;
        use crate::projections::p900_weekly_accounting::week::WeekBounds;
        use chrono::{NaiveDate, TimeZone, Utc};

        let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let processing = WeeklyReport::processing(&WeekBounds::containing(monday));
        let mut completed = processing.clone();
        completed.status = ReportStatus::Completed;
        completed.calculated_at = Some(Utc.with_ymd_and_hms(2025, 1, 13, 3, 0, 0).unwrap());

        assert!(!sales_outdated(None, &processing));
        assert!(sales_outdated(Some(&processing), &completed));

        let mut paid = completed.clone();
        paid.is_paid = true;
        assert!(!sales_outdated(Some(&completed), &paid));

        let mut recalculated = completed.clone();
        recalculated.calculated_at = Some(Utc.with_ymd_and_hms(2025, 1, 14, 9, 0, 0).unwrap());
        assert!(sales_outdated(Some(&completed), &recalculated));

        // Сброс пейджера после пересчёта: запрос снова с первой страницы
        let mut pager = SalesPager::new(SaleSortField::Revenue);
        pager.apply_page(page(&[("s-1", "A")], true));
        pager.reset();
        assert!(pager.items.is_empty());
        assert!(pager.next_query().unwrap().after.is_none());
    }
}
