//! Tab labels - заголовки табов по ключу.

use contracts::domain::a001_banner::aggregate::BannerKind;

/// Префиксы ключей табов с деталями
pub const PICKUP_POINT_DETAIL_PREFIX: &str = "a002_pickup_point_detail_";
pub const PICKUP_POINT_NEW: &str = "a002_pickup_point_new";
pub const WEEKLY_REPORT_PREFIX: &str = "p900_weekly_report_";

/// Ключ таба со списком баннеров одного вида
pub fn banner_tab_key(kind: BannerKind) -> &'static str {
    match kind {
        BannerKind::Market => "a001_banner_market",
        BannerKind::TopAd => "a001_banner_top_ad",
    }
}

/// Возвращает читаемый заголовок таба для данного ключа. Fallback: сам ключ.
pub fn tab_label_for_key(key: &str) -> &str {
    match key {
        "a001_banner_market" => "Баннеры маркета",
        "a001_banner_top_ad" => "Рекламные баннеры",
        "a002_pickup_point" => "Пункты выдачи",
        PICKUP_POINT_NEW => "Новый пункт выдачи",
        "a003_archived_product" => "Архив товаров",
        "p900_weekly_accounting" => "Недельные расчёты",
        "d400_usage_metrics" => "Метрики использования",
        other => other,
    }
}

/// Заголовок таба, восстановленного из адреса, когда имени сущности ещё нет
pub fn restored_tab_title(key: &str) -> String {
    if let Some(id) = key.strip_prefix(PICKUP_POINT_DETAIL_PREFIX) {
        return detail_tab_label("Пункт выдачи", id);
    }
    if let Some(week_id) = key.strip_prefix(WEEKLY_REPORT_PREFIX) {
        return detail_tab_label("Неделя", week_id);
    }
    tab_label_for_key(key).to_string()
}

/// Заголовок таба деталей: `"<префикс>: <идентификатор>"`
pub fn detail_tab_label(prefix: &str, identifier: &str) -> String {
    format!("{}: {}", prefix, identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restored_tab_title() {
        assert_eq!(restored_tab_title("a002_pickup_point"), "Пункты выдачи");
        assert_eq!(
            restored_tab_title("a002_pickup_point_detail_42"),
            "Пункт выдачи: 42"
        );
        assert_eq!(
            restored_tab_title("p900_weekly_report_2025-01-06"),
            "Неделя: 2025-01-06"
        );
        assert_eq!(restored_tab_title("unknown"), "unknown");
    }
}
