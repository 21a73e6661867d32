pub mod api_error;
pub mod format;
pub mod live;
pub mod search;
pub mod taxonomy;
