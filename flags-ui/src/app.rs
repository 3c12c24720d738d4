use crate::components::dashboard::Dashboard;
use crate::config::PAGE_TITLE;
use leptos::*;

/// Page shell. Expects an [`ApiClient`](crate::bridge::ApiClient) in context.
#[component]
pub fn App() -> impl IntoView {
    view! {
      <div style="padding:20px;font-family:Inter, system-ui, Arial">
        <h1>{PAGE_TITLE}</h1>
        <Dashboard/>
      </div>
    }
}
