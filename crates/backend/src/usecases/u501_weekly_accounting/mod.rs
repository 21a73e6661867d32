pub mod aggregation;
pub mod executor;
pub mod scheduler;
pub mod service;

pub use scheduler::AccountingScheduler;
