// Агрегаты
pub mod a001_banner;
pub mod a002_pickup_point;
pub mod a003_archived_product;
pub mod a004_marketplace_order;
pub mod a005_shop;

// Проекции, юзкейсы, дашборды
pub mod d400_usage_metrics;
pub mod p900_weekly_accounting;
pub mod u501_weekly_accounting;

// Общее
pub mod live;
pub mod taxonomy;
