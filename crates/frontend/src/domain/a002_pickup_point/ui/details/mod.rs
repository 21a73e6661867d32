//! Карточка пункта выдачи: форма, выбор координат на карте, активность.
//!
//! - view_model.rs: состояние формы и команды
//! - view.rs: компонент

mod view;
mod view_model;

pub use view::PickupPointDetails;
pub use view_model::PickupPointDetailsViewModel;
