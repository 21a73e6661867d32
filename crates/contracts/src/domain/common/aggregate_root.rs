/// Трейт для корня агрегата
///
/// Статические метаданные класса агрегата: индекс, имя коллекции в БД
/// и имена для UI.
pub trait AggregateRoot {
    /// Тип идентификатора агрегата
    type Id;

    /// Получить ID записи
    fn id(&self) -> Self::Id;

    /// Индекс агрегата в системе (например, "a001")
    fn aggregate_index() -> &'static str;

    /// Имя коллекции для БД и live-подписок (например, "banner")
    fn collection_name() -> &'static str;

    /// Имя элемента для UI (единственное число)
    fn element_name() -> &'static str;

    /// Имя списка для UI (множественное число)
    fn list_name() -> &'static str;

    /// Полное имя таблицы: `{index}_{collection}`
    fn table_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }

    /// Ссылка на запись для логов и ошибок: `a001_banner 5f0c...`
    fn record_ref(id: impl std::fmt::Display) -> String {
        format!("{} {}", Self::table_name(), id)
    }
}
