pub mod api_utils;
pub mod components;
pub mod config;
pub mod export;
pub mod icons;
pub mod live;
pub mod maps;
pub mod page_frame;
