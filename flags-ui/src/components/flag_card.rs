use crate::actions::{self, InFlight};
use crate::bridge::ApiClient;
use crate::browser;
use crate::dto::Flag;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

const CARD_STYLE: &str =
    "border:1px solid #e5e7eb;padding:12px;border-radius:8px;background:#fff";
const META_STYLE: &str = "font-size:13px;color:#6b7280";
const BUTTON_STYLE: &str =
    "padding:8px 12px;border-radius:6px;border:none;background:#111827;color:#fff";

#[component]
pub fn FlagCard(flag: Flag) -> impl IntoView {
    let client = expect_context::<ApiClient>();
    let in_flight = InFlight::new();
    let key = flag.key();

    let on_report = move |_: ev::MouseEvent| {
        let client = client.clone();
        let key = key.clone();
        spawn_local(async move {
            if let Some(notice) = actions::activate_report(&client, &key, in_flight).await {
                browser::alert(notice.message());
            }
        });
    };

    let last_seen = flag.last_seen.clone().map(|seen| {
        view! { <div><strong>"Last seen:"</strong> " " {seen}</div> }
    });

    view! {
      <div class="flag-card" style=CARD_STYLE>
        <h3 style="margin:0 0 8px 0">{flag.title().to_string()}</h3>
        <div class="meta" style=META_STYLE>
          <div><strong>"Platform:"</strong> " " {flag.platform.clone()}</div>
          <div><strong>"Handle:"</strong> " " {flag.handle.clone()}</div>
          <div><strong>"Score:"</strong> " " {flag.risk_score_text()}</div>
          {last_seen}
        </div>
        <p style="margin-top:8px;font-size:13px">{flag.description_text().to_string()}</p>
        <p style="font-size:12px;color:#374151">
          <strong>"Reasons:"</strong> " " {flag.reasons_text()}
        </p>
        <div style="margin-top:8px">
          <button
            style=BUTTON_STYLE
            disabled=move || in_flight.is_active()
            on:click=on_report
          >
            {move || if in_flight.is_active() { "Marking…" } else { "Mark for manual review" }}
          </button>
        </div>
      </div>
    }
}
