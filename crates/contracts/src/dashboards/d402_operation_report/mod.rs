pub mod day_axis;
pub mod dto;

pub use day_axis::{validate_day_axis, DayAxisError};
pub use dto::*;
