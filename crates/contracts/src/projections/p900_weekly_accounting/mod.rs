//! Недельная бухгалтерия продавцов: отчёты по неделям и строки продаж.

pub mod dto;
pub mod pager;
pub mod week;

pub use dto::*;
