//! Метрики использования: операции с документами и вызовы функций.

pub mod buckets;
pub mod fallback;
pub mod monitoring;
pub mod service;
