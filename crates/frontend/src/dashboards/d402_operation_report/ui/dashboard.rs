use chrono::Local;
use leptos::ev::Event;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::report_table::ReportTable;
use crate::dashboards::d402_operation_report::api;
use crate::dashboards::d402_operation_report::coordinator::{
    parse_date_input, parse_days_input, Completion, FetchState, Pagination, ReportFilters,
};

/// Ozon operation report: товары x дни
#[component]
pub fn OperationReportDashboard() -> impl IntoView {
    let filters = RwSignal::new(ReportFilters::new(Local::now().date_naive()));
    let fetch = RwSignal::new(FetchState::default());

    let loading = Memo::new(move |_| fetch.with(|s| s.loading));
    let rows = Memo::new(move |_| {
        fetch.with(|s| {
            s.data
                .as_ref()
                .map(|d| d.rows.clone())
                .unwrap_or_default()
        })
    });
    let mismatched_row = Memo::new(move |_| fetch.with(|s| s.mismatched_row()));
    let pagination = Memo::new(move |_| {
        let total = fetch.with(|s| s.data.as_ref().map(|d| d.total));
        total.map(|total| Pagination::new(filters.with(|f| f.page), total))
    });

    let load = move || {
        let request = filters.get_untracked().to_request();
        let Some(seq) = fetch.try_update(|s| s.start()) else {
            return;
        };
        log::debug!("D402: request #{} {:?}", seq, request);

        spawn_local(async move {
            let result = api::fetch_report(&request).await;
            let failure = result.as_ref().err().cloned();
            let completion = fetch.try_update(|s| s.complete(seq, result));

            match completion {
                Some(Completion::Loaded) => {
                    if let Some(warning) = fetch.with_untracked(|s| s.axis_warning()) {
                        log::warn!("D402: rows do not share one day axis: {}", warning);
                    }
                }
                Some(Completion::Failed) => {
                    log::error!("D402: failed to load report: {}", failure.unwrap_or_default());
                }
                Some(Completion::Stale) => {
                    log::debug!("D402: discarded stale response #{} {:?}", seq, failure);
                }
                // компонент уже размонтирован
                None => {}
            }
        });
    };

    // Новый запрос на каждое изменение фильтров
    Effect::new(move |_| {
        filters.track();
        load();
    });

    let on_date = move |ev: Event| {
        if let Some(date) = parse_date_input(&event_target_value(&ev)) {
            filters.maybe_update(|f| replace(&mut f.date, date));
        }
    };
    let on_platform = move |ev: Event| {
        let platform = event_target_value(&ev);
        filters.maybe_update(|f| replace(&mut f.platform, platform));
    };
    let on_account = move |ev: Event| {
        let account = event_target_value(&ev);
        filters.maybe_update(|f| replace(&mut f.account, account));
    };
    let on_days = move |ev: Event| {
        filters.maybe_update(|f| {
            let days = parse_days_input(&event_target_value(&ev), f.days);
            replace(&mut f.days, days)
        });
    };

    let go_prev = move |_| {
        if let Some(p) = pagination.get_untracked() {
            filters.maybe_update(|f| replace(&mut f.page, p.prev_page()));
        }
    };
    let go_next = move |_| {
        if let Some(p) = pagination.get_untracked() {
            filters.maybe_update(|f| replace(&mut f.page, p.next_page()));
        }
    };

    view! {
        <div id="d402_operation_report--dashboard" class="d402-dashboard" style="padding: 16px;">
            <h2 style="margin: 0 0 12px 0;">"Ozon 运营报表（按商品、按日透视）"</h2>

            <Flex align=FlexAlign::Center gap=FlexGap::Medium style="flex-wrap: wrap; margin-bottom: 12px;">
                <label>
                    "选择日期："
                    <input
                        type="date"
                        prop:value=move || filters.with(|f| f.date.format("%Y-%m-%d").to_string())
                        on:change=on_date
                    />
                </label>
                <label>
                    "平台："
                    <select
                        prop:value=move || filters.with(|f| f.platform.clone())
                        on:change=on_platform
                    >
                        <option value="">"全部"</option>
                        <option value="ozon">"ozon"</option>
                    </select>
                </label>
                <label>
                    "账号："
                    <input
                        prop:value=move || filters.with(|f| f.account.clone())
                        on:input=on_account
                        placeholder="可选"
                    />
                </label>
                <label>
                    "展示天数："
                    <input
                        type="number"
                        min="1"
                        max="62"
                        style="width: 80px;"
                        prop:value=move || filters.with(|f| f.days.to_string())
                        on:input=on_days
                    />
                </label>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| load()
                    disabled=loading
                >
                    {move || if loading.get() { "加载中..." } else { "刷新" }}
                </Button>
                {move || fetch.with(|s| s.summary_line()).map(|line| view! {
                    <span class="meta" style="color: #888;">{line}</span>
                })}
            </Flex>

            {move || fetch.with(|s| s.error.clone()).map(|err| view! {
                <div class="d402-error" style="padding: 8px 12px; margin-bottom: 8px; color: var(--color-error, #d32f2f);">
                    <strong>"⚠ 加载失败："</strong>
                    {err}
                </div>
            })}

            {move || fetch.with(|s| s.axis_warning()).map(|warning| view! {
                <div class="d402-warning" style="padding: 8px 12px; margin-bottom: 8px; color: #ad6800; background: #fffbe6;">
                    <strong>"⚠ 日期列不一致："</strong>
                    {warning}
                </div>
            })}

            <ReportTable rows=rows mismatched_row=mismatched_row />

            {move || pagination.get().map(|p| view! {
                <Flex justify=FlexJustify::End align=FlexAlign::Center gap=FlexGap::Small style="margin-top: 12px;">
                    <Button
                        on_click=go_prev
                        disabled=Signal::derive(move || p.prev_disabled(loading.get()))
                    >
                        "上一页"
                    </Button>
                    <span class="meta">{p.label()}</span>
                    <Button
                        on_click=go_next
                        disabled=Signal::derive(move || p.next_disabled(loading.get()))
                    >
                        "下一页"
                    </Button>
                </Flex>
            })}
        </div>
    }
}

/// Записывает новое значение; true, если оно отличается от прежнего
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
