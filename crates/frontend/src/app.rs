use crate::dashboards::OperationReportDashboard;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <OperationReportDashboard />
    }
}
