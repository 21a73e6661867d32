pub mod a001_banner;
pub mod a002_pickup_point;
pub mod a003_archived_product;
pub mod a004_marketplace_order;
pub mod a005_shop;
