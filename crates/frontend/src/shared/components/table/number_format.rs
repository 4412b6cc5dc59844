//! Утилиты форматирования чисел для таблиц
//!
//! Неконечные значения (NaN, ±Infinity) всегда выводятся как `-`.
//! Округление повторяет `Number.prototype.toFixed(2)`, с которым сверяются
//! выгрузки отчёта: точная середина уходит от нуля, `-0.0` печатается как `0.00`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Заглушка для неконечных значений
pub const NOT_A_NUMBER: &str = "-";

/// Доля в процентах с 2 знаками после запятой
///
/// # Примеры
///
/// ```
/// use frontend::shared::components::table::format_percent;
/// assert_eq!(format_percent(0.15051), "15.05%");
/// assert_eq!(format_percent(f64::NAN), "-");
/// ```
pub fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{}%", to_fixed_2(value * 100.0))
    } else {
        NOT_A_NUMBER.to_string()
    }
}

/// Денежное значение с 2 знаками после запятой, без символа валюты и разделителей
///
/// # Примеры
///
/// ```
/// use frontend::shared::components::table::format_money;
/// assert_eq!(format_money(1234.5), "1234.50");
/// ```
pub fn format_money(value: f64) -> String {
    if value.is_finite() {
        to_fixed_2(value)
    } else {
        NOT_A_NUMBER.to_string()
    }
}

/// Два знака после запятой по точному двоичному значению `value`.
/// Знак ставится только при `value < 0.0`, поэтому `-0.0` без минуса.
fn to_fixed_2(value: f64) -> String {
    let digits = match Decimal::from_f64_retain(value.abs()) {
        Some(abs) => {
            let mut rounded = abs.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(2);
            rounded.to_string()
        }
        // за пределами диапазона Decimal
        None => format!("{:.2}", value.abs()),
    };

    if value < 0.0 {
        format!("-{}", digits)
    } else {
        digits
    }
}

/// Количество (штуки, остатки) выводится целым числом
pub fn format_count(value: u64) -> String {
    value.to_string()
}
