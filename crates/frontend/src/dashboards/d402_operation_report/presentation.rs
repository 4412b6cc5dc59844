//! Представление строк отчёта: заголовок, закреплённые ячейки, дневные ячейки
//! и раскрываемая полоса деталей.
//!
//! Содержимое ячеек (`render_header`, `render_row`) и геометрия (`Geometry`)
//! считаются раздельно: при перетаскивании границы колонки меняются только
//! стили, текст ячеек не пересчитывается.

use chrono::NaiveDate;
use contracts::dashboards::d402_operation_report::{DayMetric, ReportRow, RowKey};
use std::collections::HashMap;

use super::layout::{compute_sticky_offsets, ColumnKey, ColumnWidths, PINNED_COUNT};
use crate::shared::components::table::{format_count, format_money, format_percent};

pub const EXPAND_LABEL: &str = "展开";
pub const COLLAPSE_LABEL: &str = "收起";

/// Состояние раскрытия строк. Отсутствующий ключ = свёрнута.
///
/// Записи для строк, которых уже нет на странице, не удаляются.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandState {
    rows: HashMap<RowKey, bool>,
}

impl ExpandState {
    pub fn is_expanded(&self, key: &RowKey) -> bool {
        self.rows.get(key).copied().unwrap_or(false)
    }

    /// Инвертирует состояние строки, возвращает новое значение
    pub fn toggle(&mut self, key: &RowKey) -> bool {
        let next = !self.is_expanded(key);
        self.rows.insert(key.clone(), next);
        next
    }
}

pub fn toggle_label(expanded: bool) -> &'static str {
    if expanded {
        COLLAPSE_LABEL
    } else {
        EXPAND_LABEL
    }
}

/// Ширины и sticky-смещения, из которых строятся стили ячеек
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub widths: ColumnWidths,
    pub offsets: [i32; PINNED_COUNT],
}

impl Geometry {
    pub fn from_widths(widths: ColumnWidths) -> Self {
        Self {
            offsets: compute_sticky_offsets(&widths),
            widths,
        }
    }

    /// Левое смещение закреплённой колонки; у дневных колонок его нет
    pub fn left(&self, column: ColumnKey) -> Option<i32> {
        ColumnKey::PINNED
            .iter()
            .position(|k| *k == column)
            .map(|i| self.offsets[i])
    }

    pub fn cell_style(&self, column: ColumnKey) -> String {
        let width = self.widths.get(column);
        match self.left(column) {
            Some(left) => format!("left: {left}px; width: {width}px; min-width: {width}px;"),
            None => format!("width: {width}px; min-width: {width}px;"),
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::from_widths(ColumnWidths::default())
    }
}

/// Ячейка заголовка
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub column: ColumnKey,
    pub title: String,
    /// Дата под номером дня (только у дневных колонок)
    pub subtitle: Option<String>,
}

/// Заголовок: закреплённые колонки, затем "第k天" с датой для каждого дня
pub fn render_header(day_columns: &[NaiveDate]) -> Vec<HeaderCell> {
    let pinned = ColumnKey::PINNED.iter().map(|column| HeaderCell {
        column: *column,
        title: column.label().to_string(),
        subtitle: None,
    });
    let days = day_columns.iter().enumerate().map(|(i, date)| HeaderCell {
        column: ColumnKey::Day,
        title: format!("第{}天", i + 1),
        subtitle: Some(date.format("%Y-%m-%d").to_string()),
    });
    pinned.chain(days).collect()
}

/// Ячейка закреплённой колонки
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedCell {
    pub column: ColumnKey,
    pub text: String,
}

/// Подпись и значение метрики внутри дневной ячейки
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricField {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub fields: Vec<MetricField>,
}

/// Полоса деталей под раскрытой строкой, на всю ширину таблицы
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailStrip {
    pub colspan: usize,
    pub ad_sales_ratio: String,
    pub platform: String,
    pub account: String,
}

impl DetailStrip {
    pub fn ratio_line(&self) -> String {
        format!("12日广告销量占比：{}", self.ad_sales_ratio)
    }

    pub fn identity_line(&self) -> String {
        format!("平台：{}，账号：{}", self.platform, self.account)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub key: RowKey,
    pub toggle_label: &'static str,
    pub pinned: Vec<PinnedCell>,
    pub days: Vec<DayCell>,
    pub detail: Option<DetailStrip>,
}

/// Строит строку: закреплённые ячейки, по ячейке на каждый день строки
/// (в порядке ряда, без пересортировки) и полосу деталей, если строка раскрыта.
pub fn render_row(row: &ReportRow, day_column_count: usize, expanded: bool) -> RowView {
    let pinned = ColumnKey::PINNED
        .iter()
        .map(|column| PinnedCell {
            column: *column,
            text: pinned_text(row, *column),
        })
        .collect();

    let days = row.days.iter().map(render_day).collect();

    let detail = expanded.then(|| DetailStrip {
        colspan: PINNED_COUNT + day_column_count,
        ad_sales_ratio: format_percent(row.summary_12d.ad_sales_ratio),
        platform: row.platform.clone().unwrap_or_default(),
        account: row.account.clone().unwrap_or_default(),
    });

    RowView {
        key: row.key(),
        toggle_label: toggle_label(expanded),
        pinned,
        days,
        detail,
    }
}

fn pinned_text(row: &ReportRow, column: ColumnKey) -> String {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let summary = &row.summary_12d;
    match column {
        ColumnKey::Category => text(&row.category),
        ColumnKey::NameCn => text(&row.name_cn),
        ColumnKey::Sku => text(&row.sku),
        ColumnKey::SumQty => format_count(summary.sales_qty),
        ColumnKey::SumAmount => format_money(summary.sales_amount),
        ColumnKey::SumAdRatio => format_percent(summary.ad_ratio),
        ColumnKey::OzonId => text(&row.ozon_id),
        ColumnKey::Day => String::new(),
    }
}

fn render_day(day: &DayMetric) -> DayCell {
    let field = |label, value| MetricField { label, value };
    DayCell {
        date: day.date,
        fields: vec![
            field("销量", format_count(day.total_sales_qty)),
            field("广告", format_count(day.ad_sales_qty)),
            field("自然", format_count(day.natural_sales_qty)),
            field("销售额", format_money(day.sales_amount)),
            field("售价", format_money(day.avg_price)),
            field("成本", format_money(day.goods_cost)),
            field("销售成本", format_money(day.sales_cost)),
            field("广告费", format_money(day.ad_spend)),
            field("回款", format_money(day.payout)),
            field("利润", format_money(day.profit)),
            field("库存", format_count(day.inventory)),
            field("广告占比", format_percent(day.ad_ratio)),
        ],
    }
}
