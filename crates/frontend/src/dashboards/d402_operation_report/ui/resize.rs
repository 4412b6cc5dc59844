//! Изменение ширины колонок мышью.
//!
//! На время сессии (mousedown на ручке -> mouseup где угодно) вешаются
//! слушатели mousemove/mouseup на window, чтобы перетаскивание продолжалось
//! за пределами ручки и таблицы. Слушатели снимаются ровно один раз при
//! выходе из сессии.

use leptos::ev;
use leptos::prelude::*;

use crate::dashboards::d402_operation_report::layout::{ColumnKey, ColumnWidths, ResizeState};

/// Слушатели window одной сессии; снимаются при drop
struct WindowListeners {
    handles: Vec<WindowListenerHandle>,
}

impl Drop for WindowListeners {
    fn drop(&mut self) {
        for handle in self.handles.drain(..) {
            handle.remove();
        }
    }
}

/// Контроллер resize-сессий таблицы
#[derive(Clone, Copy)]
pub struct ColumnResizer {
    widths: RwSignal<ColumnWidths>,
    session: StoredValue<ResizeState>,
    listeners: StoredValue<Option<WindowListeners>, LocalStorage>,
}

impl ColumnResizer {
    pub fn new(widths: RwSignal<ColumnWidths>) -> Self {
        let resizer = Self {
            widths,
            session: StoredValue::new(ResizeState::Idle),
            listeners: StoredValue::new_local(None),
        };
        on_cleanup(move || resizer.end());
        resizer
    }

    /// mousedown на ручке колонки: начинает новую сессию (старая завершается)
    pub fn begin(self, column: ColumnKey, ev: ev::MouseEvent) {
        ev.prevent_default();
        ev.stop_propagation();
        self.end();

        let current_width = self.widths.get_untracked().get(column);
        self.session
            .update_value(|s| s.begin(column, ev.client_x(), current_width));

        let on_move = window_event_listener(ev::mousemove, move |ev: ev::MouseEvent| {
            let Some(session) = self.session.try_get_value() else {
                return;
            };
            self.widths
                .maybe_update(|w| w.apply_drag(&session, ev.client_x()));
        });
        let on_up = window_event_listener(ev::mouseup, move |_ev: ev::MouseEvent| {
            self.end();
        });

        self.listeners.set_value(Some(WindowListeners {
            handles: vec![on_move, on_up],
        }));
        set_body_resizing(true);
    }

    /// Завершает сессию и снимает слушатели window
    pub fn end(self) {
        let finished = self
            .session
            .try_update_value(|s| {
                let column = s.column();
                s.end();
                column
            })
            .flatten();
        // drop снимает слушатели
        let _ = self.listeners.try_update_value(|l| l.take());

        if let Some(column) = finished {
            set_body_resizing(false);
            if let Some(widths) = self.widths.try_get_untracked() {
                log::debug!("D402: column {} resized to {}px", column.code(), widths.get(column));
            }
        }
    }
}

fn set_body_resizing(active: bool) {
    let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    else {
        return;
    };
    let (cursor, select) = if active {
        ("col-resize", "none")
    } else {
        ("", "")
    };
    let _ = body.style().set_property("cursor", cursor);
    let _ = body.style().set_property("user-select", select);
}
