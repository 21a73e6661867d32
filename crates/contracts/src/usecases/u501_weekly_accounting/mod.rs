pub mod request;
pub mod response;

pub use request::{TriggerMode, TriggerRequest};
pub use response::{TriggerResponse, TriggerStatus};

use crate::usecases::common::UseCaseMetadata;

pub struct WeeklyAccounting;

impl UseCaseMetadata for WeeklyAccounting {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "weekly_accounting"
    }

    fn display_name() -> &'static str {
        "Расчёт недельной бухгалтерии"
    }

    fn description() -> &'static str {
        "Агрегация строк заказов за неделю по продавцам"
    }
}
