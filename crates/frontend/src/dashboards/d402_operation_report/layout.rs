//! Раскладка колонок отчёта: ширины, sticky-смещения, ось дней и resize-сессия.
//!
//! Всё здесь чистые функции и значения без DOM; компоненты в `ui` только
//! читают результат и передают сюда события указателя.

use chrono::NaiveDate;
use contracts::dashboards::d402_operation_report::ReportRow;

/// Нижняя граница ширины любой колонки (px)
pub const MIN_COLUMN_WIDTH: i32 = 80;

/// Число закреплённых колонок слева
pub const PINNED_COUNT: usize = 7;

/// Ключ колонки. Все дневные колонки делят один ключ `Day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    Category,
    NameCn,
    Sku,
    SumQty,
    SumAmount,
    SumAdRatio,
    OzonId,
    Day,
}

impl ColumnKey {
    /// Закреплённые колонки в порядке объявления
    pub const PINNED: [ColumnKey; PINNED_COUNT] = [
        ColumnKey::Category,
        ColumnKey::NameCn,
        ColumnKey::Sku,
        ColumnKey::SumQty,
        ColumnKey::SumAmount,
        ColumnKey::SumAdRatio,
        ColumnKey::OzonId,
    ];

    /// Заголовок колонки
    pub fn label(self) -> &'static str {
        match self {
            ColumnKey::Category => "大类目",
            ColumnKey::NameCn => "中文类目",
            ColumnKey::Sku => "类目名称",
            ColumnKey::SumQty => "12日销量",
            ColumnKey::SumAmount => "12日销售额",
            ColumnKey::SumAdRatio => "12日广告占比",
            ColumnKey::OzonId => "Ozon ID",
            ColumnKey::Day => "",
        }
    }

    /// Короткий код для data-атрибутов
    pub fn code(self) -> &'static str {
        match self {
            ColumnKey::Category => "cat",
            ColumnKey::NameCn => "nameCn",
            ColumnKey::Sku => "sku",
            ColumnKey::SumQty => "sumQty",
            ColumnKey::SumAmount => "sumAmt",
            ColumnKey::SumAdRatio => "sumAd",
            ColumnKey::OzonId => "ozid",
            ColumnKey::Day => "day",
        }
    }
}

/// Ширины колонок (px). Живут только в рамках экземпляра таблицы.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWidths {
    pub category: i32,
    pub name_cn: i32,
    pub sku: i32,
    pub sum_qty: i32,
    pub sum_amount: i32,
    pub sum_ad_ratio: i32,
    pub ozon_id: i32,
    pub day: i32,
}

impl Default for ColumnWidths {
    fn default() -> Self {
        Self {
            category: 110,
            name_cn: 140,
            sku: 160,
            sum_qty: 110,
            sum_amount: 120,
            sum_ad_ratio: 110,
            ozon_id: 120,
            day: 120,
        }
    }
}

impl ColumnWidths {
    pub fn get(&self, key: ColumnKey) -> i32 {
        match key {
            ColumnKey::Category => self.category,
            ColumnKey::NameCn => self.name_cn,
            ColumnKey::Sku => self.sku,
            ColumnKey::SumQty => self.sum_qty,
            ColumnKey::SumAmount => self.sum_amount,
            ColumnKey::SumAdRatio => self.sum_ad_ratio,
            ColumnKey::OzonId => self.ozon_id,
            ColumnKey::Day => self.day,
        }
    }

    /// Устанавливает ширину, не опускаясь ниже `MIN_COLUMN_WIDTH`
    pub fn set(&mut self, key: ColumnKey, width: i32) {
        let width = width.max(MIN_COLUMN_WIDTH);
        let slot = match key {
            ColumnKey::Category => &mut self.category,
            ColumnKey::NameCn => &mut self.name_cn,
            ColumnKey::Sku => &mut self.sku,
            ColumnKey::SumQty => &mut self.sum_qty,
            ColumnKey::SumAmount => &mut self.sum_amount,
            ColumnKey::SumAdRatio => &mut self.sum_ad_ratio,
            ColumnKey::OzonId => &mut self.ozon_id,
            ColumnKey::Day => &mut self.day,
        };
        *slot = width;
    }

    /// Применяет позицию указателя к колонке активной сессии.
    /// Возвращает true, если ширина изменилась.
    pub fn apply_drag(&mut self, session: &ResizeState, pointer_x: i32) -> bool {
        let Some((column, width)) = session.width_at(pointer_x) else {
            return false;
        };
        if self.get(column) == width {
            return false;
        }
        self.set(column, width);
        true
    }
}

/// Левые смещения закреплённых колонок:
/// offset[0] = 0, offset[i] = offset[i-1] + width(i-1)
pub fn compute_sticky_offsets(widths: &ColumnWidths) -> [i32; PINNED_COUNT] {
    let mut offsets = [0; PINNED_COUNT];
    for i in 1..PINNED_COUNT {
        offsets[i] = offsets[i - 1] + widths.get(ColumnKey::PINNED[i - 1]);
    }
    offsets
}

/// Даты дневных колонок берутся из первой строки.
/// Согласованность остальных строк проверяет `validate_day_axis`.
pub fn derive_day_columns(rows: &[ReportRow]) -> Vec<NaiveDate> {
    rows.first()
        .map(|row| row.dates().collect())
        .unwrap_or_default()
}

/// Состояние изменения ширины колонки мышью.
///
/// Ширина всегда считается от якоря (начальные X и ширина), а не от
/// предыдущего события, поэтому повторные события в той же точке не
/// накапливают сдвиг.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Resizing {
        column: ColumnKey,
        anchor_x: i32,
        anchor_width: i32,
    },
}

impl ResizeState {
    /// Начинает сессию; предыдущая сессия, если была, заменяется
    pub fn begin(&mut self, column: ColumnKey, pointer_x: i32, current_width: i32) {
        *self = ResizeState::Resizing {
            column,
            anchor_x: pointer_x,
            anchor_width: current_width,
        };
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ResizeState::Resizing { .. })
    }

    pub fn column(&self) -> Option<ColumnKey> {
        match self {
            ResizeState::Idle => None,
            ResizeState::Resizing { column, .. } => Some(*column),
        }
    }

    /// Ширина колонки для текущей позиции указателя
    pub fn width_at(&self, pointer_x: i32) -> Option<(ColumnKey, i32)> {
        match *self {
            ResizeState::Idle => None,
            ResizeState::Resizing {
                column,
                anchor_x,
                anchor_width,
            } => {
                let delta = pointer_x.saturating_sub(anchor_x);
                let width = anchor_width.saturating_add(delta).max(MIN_COLUMN_WIDTH);
                Some((column, width))
            }
        }
    }

    /// Завершает сессию. Возвращает true, если сессия была активна.
    pub fn end(&mut self) -> bool {
        let was_active = self.is_active();
        *self = ResizeState::Idle;
        was_active
    }
}
