pub mod config;
pub mod data;
pub mod error;
pub mod live;
pub mod state;
pub mod storage;
