//! Фильтры отчёта, нумерация запросов и пагинация.
//!
//! Каждый запрос получает возрастающий номер; ответ применяется только если
//! его номер последний выданный. Устаревшие ответы отбрасываются, флаг
//! загрузки снимает только последний запрос (и при успехе, и при ошибке).

use chrono::NaiveDate;
use contracts::dashboards::d402_operation_report::{
    page_count, validate_day_axis, DayAxisError, ReportRequest, ReportResponse, DEFAULT_DAYS,
    DEFAULT_PAGE_SIZE, DEFAULT_PLATFORM,
};

/// Параметры, при изменении которых отчёт загружается заново
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFilters {
    pub date: NaiveDate,
    /// Пустая строка = все платформы
    pub platform: String,
    /// Пустая строка = все аккаунты
    pub account: String,
    pub days: i32,
    /// 1-based
    pub page: u32,
}

impl ReportFilters {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today,
            platform: DEFAULT_PLATFORM.to_string(),
            account: String::new(),
            days: DEFAULT_DAYS,
            page: 1,
        }
    }

    pub fn to_request(&self) -> ReportRequest {
        ReportRequest::new(self.date, &self.platform, &self.account, self.days, self.page)
    }
}

/// Разбор поля "展示天数": пусто -> 12, не число -> прежнее значение.
/// Диапазон 1..=62 не проверяется, значение уходит в API как есть.
pub fn parse_days_input(input: &str, current: i32) -> i32 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return DEFAULT_DAYS;
    }
    trimmed.parse().unwrap_or(current)
}

/// Разбор значения `<input type="date">` (YYYY-MM-DD)
pub fn parse_date_input(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// Выдаёт монотонно возрастающие номера запросов
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }
}

/// Чем закончился запрос
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Ответ на устаревший запрос; состояние не изменилось
    Stale,
    Loaded,
    Failed,
}

/// Состояние загрузки отчёта
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState {
    sequencer: RequestSequencer,
    pub loading: bool,
    pub data: Option<ReportResponse>,
    pub error: Option<String>,
    /// Строки страницы не делят одну ось дней
    pub axis_error: Option<DayAxisError>,
}

impl FetchState {
    /// Регистрирует новый запрос, возвращает его номер
    pub fn start(&mut self) -> u64 {
        self.loading = true;
        self.sequencer.issue()
    }

    /// Применяет результат запроса `seq`, если он последний выданный
    pub fn complete(&mut self, seq: u64, result: Result<ReportResponse, String>) -> Completion {
        if !self.sequencer.is_current(seq) {
            return Completion::Stale;
        }
        self.loading = false;
        match result {
            Ok(response) => {
                self.axis_error = validate_day_axis(&response.rows).err();
                self.data = Some(response);
                self.error = None;
                Completion::Loaded
            }
            Err(e) => {
                self.error = Some(e);
                Completion::Failed
            }
        }
    }

    pub fn axis_warning(&self) -> Option<String> {
        self.axis_error.as_ref().map(|e| e.to_string())
    }

    /// Индекс строки страницы, на которой ось дней разошлась
    pub fn mismatched_row(&self) -> Option<usize> {
        self.axis_error.as_ref().map(DayAxisError::row)
    }

    pub fn summary_line(&self) -> Option<String> {
        self.data.as_ref().map(|resp| {
            format!(
                "时间范围：{} ~ {}（{}天） | 共 {} 个商品",
                resp.start, resp.end, resp.days_count, resp.total
            )
        })
    }
}

/// Пагинация по текущей странице фильтров и total из ответа
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Pagination {
    pub fn new(page: u32, total: u64) -> Self {
        Self {
            page,
            page_size: DEFAULT_PAGE_SIZE,
            total,
        }
    }

    pub fn page_count(&self) -> u64 {
        page_count(self.total, self.page_size)
    }

    pub fn prev_disabled(&self, loading: bool) -> bool {
        loading || self.page <= 1
    }

    pub fn next_disabled(&self, loading: bool) -> bool {
        loading || u64::from(self.page) >= self.page_count()
    }

    pub fn prev_page(&self) -> u32 {
        self.page.saturating_sub(1).max(1)
    }

    pub fn next_page(&self) -> u32 {
        self.page.saturating_add(1)
    }

    pub fn label(&self) -> String {
        format!("第 {} / {} 页", self.page, self.page_count().max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d402_operation_report::{DayMetric, ReportRow};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn day(date: NaiveDate) -> DayMetric {
        DayMetric {
            date,
            ..Default::default()
        }
    }

    fn response(total: u64) -> ReportResponse {
        ReportResponse {
            start: date("2024-05-01"),
            end: date("2024-05-12"),
            days_count: 12,
            page: 1,
            page_size: 20,
            total,
            rows: Vec::new(),
        }
    }

    fn misaligned_response() -> ReportResponse {
        let mut resp = response(2);
        resp.rows = vec![
            ReportRow {
                days: vec![day(date("2024-05-01")), day(date("2024-05-02"))],
                ..Default::default()
            },
            ReportRow {
                days: vec![day(date("2024-05-01"))],
                ..Default::default()
            },
        ];
        resp
    }

    #[test]
    fn test_default_filters() {
        let filters = ReportFilters::new(date("2024-05-12"));
        assert_eq!(filters.platform, "ozon");
        assert_eq!(filters.account, "");
        assert_eq!(filters.days, 12);
        assert_eq!(filters.page, 1);

        let request = filters.to_request();
        assert_eq!(request.platform.as_deref(), Some("ozon"));
        assert_eq!(request.account, None);
        assert_eq!(request.page_size, 20);
    }

    #[test]
    fn test_parse_days_input() {
        assert_eq!(parse_days_input("", 30), 12);
        assert_eq!(parse_days_input("7", 12), 7);
        assert_eq!(parse_days_input("100", 12), 100);
        assert_eq!(parse_days_input("0", 12), 0);
        assert_eq!(parse_days_input("abc", 30), 30);
    }

    #[test]
    fn test_parse_date_input() {
        assert_eq!(parse_date_input("2024-05-12"), Some(date("2024-05-12")));
        assert_eq!(parse_date_input(""), None);
    }

    #[test]
    fn test_sequencer() {
        let mut seq = RequestSequencer::default();
        let first = seq.issue();
        let second = seq.issue();
        assert!(second > first);
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut state = FetchState::default();
        let old = state.start();
        let new = state.start();

        assert_eq!(state.complete(new, Ok(response(5))), Completion::Loaded);
        assert!(!state.loading);
        assert_eq!(state.complete(old, Ok(response(99))), Completion::Stale);
        assert_eq!(state.data.as_ref().map(|d| d.total), Some(5));
    }

    #[test]
    fn test_stale_failure_is_not_a_failure() {
        let mut state = FetchState::default();
        let old = state.start();
        let _new = state.start();

        let completion = state.complete(old, Err("timeout".into()));
        assert_eq!(completion, Completion::Stale);
        assert!(state.loading);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_failure_clears_loading_and_keeps_data() {
        let mut state = FetchState::default();
        let first = state.start();
        state.complete(first, Ok(response(3)));

        let second = state.start();
        assert!(state.loading);
        let completion = state.complete(second, Err("HTTP error: 500".into()));
        assert_eq!(completion, Completion::Failed);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("HTTP error: 500"));
        assert_eq!(state.data.as_ref().map(|d| d.total), Some(3));
    }

    #[test]
    fn test_axis_warning_is_reported() {
        let mut state = FetchState::default();
        let seq = state.start();
        state.complete(seq, Ok(misaligned_response()));
        assert_eq!(
            state.axis_warning().as_deref(),
            Some("row 1: expected 2 days, got 1")
        );
        assert_eq!(state.mismatched_row(), Some(1));

        let seq = state.start();
        state.complete(seq, Ok(response(0)));
        assert_eq!(state.axis_warning(), None);
        assert_eq!(state.mismatched_row(), None);
    }

    #[test]
    fn test_summary_line() {
        let mut state = FetchState::default();
        assert_eq!(state.summary_line(), None);
        let seq = state.start();
        state.complete(seq, Ok(response(1)));
        assert_eq!(
            state.summary_line().as_deref(),
            Some("时间范围：2024-05-01 ~ 2024-05-12（12天） | 共 1 个商品")
        );
    }

    #[test]
    fn test_pagination_boundaries() {
        for page in 1..=3 {
            let p = Pagination::new(page, 45);
            assert_eq!(p.page_count(), 3);
            assert_eq!(p.prev_disabled(false), page == 1);
            assert_eq!(p.next_disabled(false), page == 3);
            assert!(p.prev_disabled(true));
            assert!(p.next_disabled(true));
        }
    }

    #[test]
    fn test_pagination_navigation() {
        assert_eq!(Pagination::new(1, 45).prev_page(), 1);
        assert_eq!(Pagination::new(3, 45).prev_page(), 2);
        assert_eq!(Pagination::new(2, 45).next_page(), 3);
    }

    #[test]
    fn test_pagination_label() {
        assert_eq!(Pagination::new(1, 1).label(), "第 1 / 1 页");
        assert_eq!(Pagination::new(1, 0).label(), "第 1 / 1 页");
        assert_eq!(Pagination::new(2, 45).label(), "第 2 / 3 页");
        assert!(Pagination::new(1, 0).next_disabled(false));
    }

    #[test]
    fn test_single_row_report_end_to_end() {
        use crate::dashboards::d402_operation_report::layout::derive_day_columns;
        use crate::dashboards::d402_operation_report::presentation::{
            render_header, render_row, ExpandState,
        };
        use contracts::dashboards::d402_operation_report::Summary12D;

        let row = ReportRow {
            platform: Some("ozon".into()),
            account: Some("acc1".into()),
            ozon_id: Some("123".into()),
            summary_12d: Summary12D {
                sales_qty: 10,
                sales_amount: 100.0,
                ad_sales_qty: 2,
                ad_spend: 5.0,
                ad_ratio: 0.05,
                ad_sales_ratio: 0.2,
            },
            days: date("2024-05-01").iter_days().take(12).map(day).collect(),
            ..Default::default()
        };
        let mut resp = response(1);
        resp.rows = vec![row];

        let mut state = FetchState::default();
        let seq = state.start();
        assert_eq!(state.complete(seq, Ok(resp)), Completion::Loaded);
        assert_eq!(state.axis_error, None);

        let data = state.data.as_ref().unwrap();
        assert_eq!(data.rows.len(), 1);

        let days = derive_day_columns(&data.rows);
        assert_eq!(days.len(), 12);
        let header = render_header(&days);
        let day_headers: Vec<_> = header.iter().skip(7).collect();
        assert_eq!(day_headers[0].title, "第1天");
        assert_eq!(day_headers[0].subtitle.as_deref(), Some("2024-05-01"));
        assert_eq!(day_headers[11].title, "第12天");
        assert_eq!(day_headers[11].subtitle.as_deref(), Some("2024-05-12"));

        assert_eq!(Pagination::new(1, data.total).label(), "第 1 / 1 页");

        let row = &data.rows[0];
        let mut expand = ExpandState::default();
        let collapsed = render_row(row, days.len(), expand.is_expanded(&row.key()));
        assert_eq!(collapsed.detail, None);

        expand.toggle(&row.key());
        let view = render_row(row, days.len(), expand.is_expanded(&row.key()));
        let detail = view.detail.unwrap();
        assert_eq!(detail.colspan, 19);
        assert_eq!(detail.ad_sales_ratio, "20.00%");
        assert_eq!(detail.identity_line(), "平台：ozon，账号：acc1");
    }
}
