use contracts::dashboards::d402_operation_report::ReportRow;
use leptos::prelude::*;

use super::resize::ColumnResizer;
use crate::dashboards::d402_operation_report::layout::{
    derive_day_columns, ColumnKey, ColumnWidths, PINNED_COUNT,
};
use crate::dashboards::d402_operation_report::presentation::{
    render_header, render_row, ExpandState, Geometry,
};

const TABLE_STYLE: &str = r#"
.d402-table-wrap { overflow: auto; max-height: calc(100vh - 180px); }
.d402-table { border-collapse: separate; border-spacing: 0; table-layout: fixed; }
.d402-table th, .d402-table td { border-bottom: 1px solid #eee; padding: 6px 8px; vertical-align: top; background: #fff; }
.d402-table thead th { position: sticky; top: 0; z-index: 2; }
.d402-table .sticky-col { position: sticky; z-index: 1; }
.d402-table thead .sticky-col { z-index: 3; }
.d402-table .th-inner { position: relative; padding-right: 6px; }
.d402-table .col-resizer { position: absolute; top: 0; right: -8px; width: 8px; height: 100%; cursor: col-resize; }
.d402-table .cell-grid { display: grid; grid-template-columns: 1fr; gap: 2px; font-size: 12px; }
.d402-table .cell-grid > div { display: flex; justify-content: space-between; gap: 4px; }
.d402-table .meta { color: #888; }
.d402-table .nowrap { white-space: nowrap; }
.d402-table .expand { color: #1677ff; cursor: pointer; margin-left: 4px; }
.d402-table tr.axis-mismatch > td { background: #fff1f0; }
"#;

/// Сводная таблица отчёта: закреплённые колонки слева, по колонке на день.
///
/// Ширины колонок и состояние раскрытия живут только в этом экземпляре.
#[component]
pub fn ReportTable(
    /// Строки текущей страницы
    #[prop(into)]
    rows: Signal<Vec<ReportRow>>,
    /// Строка, чей ряд дат расходится с заголовком; подсвечивается
    #[prop(into)]
    mismatched_row: Signal<Option<usize>>,
) -> impl IntoView {
    let widths = RwSignal::new(ColumnWidths::default());
    let geometry = Memo::new(move |_| Geometry::from_widths(widths.get()));
    let expand = RwSignal::new(ExpandState::default());
    let resizer = ColumnResizer::new(widths);

    let day_columns = Memo::new(move |_| rows.with(|r| derive_day_columns(r)));

    view! {
        <style>{TABLE_STYLE}</style>
        <div class="d402-table-wrap">
            <table class="d402-table">
                <thead>
                    <tr>
                        {move || {
                            day_columns.with(|days| render_header(days))
                                .into_iter()
                                .map(|cell| {
                                    let column = cell.column;
                                    let class = if column == ColumnKey::Day { "day-col" } else { "sticky-col" };
                                    view! {
                                        <th
                                            class=class
                                            data-col=column.code()
                                            style=move || geometry.with(|g| g.cell_style(column))
                                        >
                                            <div class="th-inner">
                                                {cell.title}
                                                {cell.subtitle.map(|date| view! {
                                                    <br/>
                                                    <span class="meta">{date}</span>
                                                })}
                                                <span
                                                    class="col-resizer"
                                                    on:mousedown=move |ev| resizer.begin(column, ev)
                                                ></span>
                                            </div>
                                        </th>
                                    }
                                })
                                .collect_view()
                        }}
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let day_count = day_columns.with(|d| d.len());
                        let rows = rows.get();
                        let mismatched = mismatched_row.get();
                        if rows.is_empty() {
                            view! {
                                <tr>
                                    <td
                                        colspan=(PINNED_COUNT + day_count).to_string()
                                        class="meta"
                                        style="padding: 24px; text-align: center;"
                                    >
                                        "暂无数据"
                                    </td>
                                </tr>
                            }
                                .into_any()
                        } else {
                            rows.into_iter()
                                .enumerate()
                                .map(|(index, row)| {
                                    view! {
                                        <ReportTableRow
                                            row=row
                                            day_count=day_count
                                            expand=expand
                                            geometry=geometry
                                            mismatched=mismatched == Some(index)
                                        />
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }
                    }}
                </tbody>
            </table>
        </div>
    }
}

/// Строка данных и, если она раскрыта, полоса деталей под ней
#[component]
fn ReportTableRow(
    row: ReportRow,
    day_count: usize,
    expand: RwSignal<ExpandState>,
    geometry: Memo<Geometry>,
    mismatched: bool,
) -> impl IntoView {
    let key = row.key();
    let is_open = Memo::new({
        let key = key.clone();
        move |_| expand.with(|e| e.is_expanded(&key))
    });
    let on_toggle = Callback::new(move |_: ()| {
        expand.update(|e| {
            e.toggle(&key);
        });
    });

    move || {
        let view_model = render_row(&row, day_count, is_open.get());
        let toggle_label = view_model.toggle_label;

        let pinned = view_model
            .pinned
            .into_iter()
            .map(|cell| {
                let column = cell.column;
                let style = move || geometry.with(|g| g.cell_style(column));
                match column {
                    ColumnKey::OzonId => view! {
                        <td class="sticky-col nowrap" style=style>
                            {cell.text}
                            " "
                            <span class="expand" on:click=move |_| on_toggle.run(())>
                                {toggle_label}
                            </span>
                        </td>
                    }
                    .into_any(),
                    ColumnKey::NameCn => view! {
                        <td class="sticky-col meta" style=style>{cell.text}</td>
                    }
                    .into_any(),
                    _ => view! {
                        <td class="sticky-col" style=style>{cell.text}</td>
                    }
                    .into_any(),
                }
            })
            .collect_view();

        let days = view_model
            .days
            .into_iter()
            .map(|day| {
                view! {
                    <td
                        class="day-col"
                        data-date=day.date.to_string()
                        style=move || geometry.with(|g| g.cell_style(ColumnKey::Day))
                    >
                        <div class="cell-grid">
                            {day
                                .fields
                                .into_iter()
                                .map(|field| {
                                    view! {
                                        <div>
                                            <span class="meta">{field.label}</span>
                                            <span>{field.value}</span>
                                        </div>
                                    }
                                })
                                .collect_view()}
                        </div>
                    </td>
                }
            })
            .collect_view();

        let detail = view_model.detail.map(|detail| {
            let colspan = detail.colspan.to_string();
            let ratio_line = detail.ratio_line();
            let identity_line = detail.identity_line();
            view! {
                <tr class="detail-row">
                    <td colspan=colspan>
                        <div>
                            <strong>"详细"</strong>
                            "："
                            <span class="meta" style="margin-left: 8px;">{ratio_line}</span>
                        </div>
                        <div class="meta">{identity_line}</div>
                    </td>
                </tr>
            }
        });

        let class = if mismatched { "axis-mismatch" } else { "" };
        view! {
            <tr class=class>
                {pinned}
                {days}
            </tr>
            {detail}
        }
    }
}
