use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Размер страницы, с которым работает клиент отчёта
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Длина окна отчёта по умолчанию (дней)
pub const DEFAULT_DAYS: i32 = 12;
/// Платформа по умолчанию; пустая строка означает "все"
pub const DEFAULT_PLATFORM: &str = "ozon";

/// Метрики одного дня по одному SKU
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayMetric {
    pub date: NaiveDate,

    // Quantities
    #[serde(default)]
    pub total_sales_qty: u64,
    #[serde(default)]
    pub ad_sales_qty: u64,
    #[serde(default)]
    pub natural_sales_qty: u64,

    // Sums
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub goods_cost: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sales_cost: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ad_spend: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sales_amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub payout: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub profit: f64,

    #[serde(default)]
    pub inventory: u64,
    /// ad_spend / sales_amount, доля в [0, 1]
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ad_ratio: f64,
}

/// Сводка по окну отчёта для одной строки.
/// Не обязана совпадать с суммой по `days`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary12D {
    #[serde(default)]
    pub sales_qty: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub sales_amount: f64,
    #[serde(default)]
    pub ad_sales_qty: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ad_spend: f64,
    /// ad_spend / sales_amount
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ad_ratio: f64,
    /// ad_sales_qty / sales_qty
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ad_sales_ratio: f64,
}

/// Строка отчёта: один товар и его ряд дневных метрик
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub name_cn: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub ozon_id: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub summary_12d: Summary12D,
    #[serde(default)]
    pub days: Vec<DayMetric>,
}

impl ReportRow {
    pub fn key(&self) -> RowKey {
        RowKey {
            platform: self.platform.clone().unwrap_or_default(),
            account: self.account.clone().unwrap_or_default(),
            ozon_id: self.ozon_id.clone().unwrap_or_default(),
        }
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().map(|d| d.date)
    }
}

/// Идентичность строки для UI-состояния: (platform, account, ozon_id).
///
/// Уникальность в пределах страницы гарантирует сервер; при коллизии
/// строки делят одно состояние раскрытия.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    pub platform: String,
    pub account: String,
    pub ozon_id: String,
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.platform, self.account, self.ozon_id)
    }
}

/// Ответ GET /api/report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days_count: u32,
    pub page: u32,
    pub page_size: u32,
    /// Всего строк на сервере (для расчёта числа страниц)
    pub total: u64,
    #[serde(default)]
    pub rows: Vec<ReportRow>,
}

impl ReportResponse {
    pub fn page_count(&self) -> u64 {
        page_count(self.total, self.page_size)
    }
}

/// ceil(total / page_size); при нулевом размере страницы страниц нет
pub fn page_count(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size))
}

/// Параметры запроса GET /api/report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    /// Отправляется как есть, без проверки диапазона 1..=62
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<i32>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl ReportRequest {
    pub fn new(date: NaiveDate, platform: &str, account: &str, days: i32, page: u32) -> Self {
        Self {
            date,
            platform: non_empty(platform),
            account: non_empty(account),
            days: Some(days),
            page,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Пустые platform/account приводятся к None ("все")
    pub fn normalized(self) -> Self {
        Self {
            platform: self.platform.as_deref().and_then(non_empty),
            account: self.account.as_deref().and_then(non_empty),
            ..self
        }
    }
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Число, null или строка ("NaN", "Infinity", "1,234.5").
/// null и нечисловые маркеры превращаются в неконечные значения.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(f64::NAN),
        Some(Raw::Number(v)) => Ok(v),
        Some(Raw::Text(s)) => match s.trim() {
            "NaN" | "nan" => Ok(f64::NAN),
            "Infinity" | "+Infinity" | "inf" => Ok(f64::INFINITY),
            "-Infinity" | "-inf" => Ok(f64::NEG_INFINITY),
            other => other
                .replace(',', "")
                .parse::<f64>()
                .map_err(serde::de::Error::custom),
        },
    }
}
