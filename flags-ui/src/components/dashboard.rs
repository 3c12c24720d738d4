use crate::actions::{self, InFlight};
use crate::bridge::ApiClient;
use crate::browser;
use crate::components::flag_card::FlagCard;
use crate::dto::{Flag, FlagKey};
use leptos::*;
use wasm_bindgen_futures::spawn_local;

pub const PLACEHOLDER: &str = "No flagged items yet.";

const GRID_STYLE: &str =
    "display:grid;grid-template-columns:repeat(auto-fit,minmax(320px,1fr));gap:12px";

/// Identity of a rendered card. The serialized record is part of it so a
/// reload that changes a flag's content rebuilds that card instead of keeping
/// the old view under the same `(platform, handle)`.
pub type CardKey = (FlagKey, String);

pub fn card_key(flag: &Flag) -> CardKey {
    (flag.key(), serde_json::to_string(flag).unwrap_or_default())
}

pub fn shows_placeholder(flags: &[Flag]) -> bool {
    flags.is_empty()
}

/// One entry per card, in list order.
pub fn card_entries(flags: &[Flag]) -> Vec<(CardKey, Flag)> {
    flags.iter().map(|f| (card_key(f), f.clone())).collect()
}

fn count_label(count: usize) -> String {
    match count {
        1 => "1 flagged item".to_string(),
        n => format!("{n} flagged items"),
    }
}

#[component]
pub fn Dashboard() -> impl IntoView {
    let client = store_value(expect_context::<ApiClient>());
    let (flags, set_flags) = create_signal(Vec::<Flag>::new());
    let loading = InFlight::new();

    let load = move || {
        let client = client.get_value();
        spawn_local(async move {
            actions::refresh(&client, set_flags, loading).await;
        });
    };

    load();

    let export = move |_: ev::MouseEvent| {
        flags.with_untracked(|list| {
            if let Err(err) = browser::download_csv(list) {
                tracing::error!(error = %err, "flag report export failed");
            }
        });
    };

    view! {
      <div>
        <div class="toolbar" style="display:flex;gap:8px;align-items:center;margin-bottom:12px">
          <button on:click=move |_| load() disabled=move || loading.is_active()>"Refresh"</button>
          <button on:click=export disabled=move || flags.with(|list| shows_placeholder(list))>
            "Export CSV"
          </button>
          <span class="meta">{move || count_label(flags.with(Vec::len))}</span>
        </div>
        <Show
          when=move || !flags.with(|list| shows_placeholder(list))
          fallback=|| view! { <p>{PLACEHOLDER}</p> }
        >
          <div style=GRID_STYLE>
            <For
              each=move || flags.with(|list| card_entries(list))
              key=|(key, _)| key.clone()
              children=|(_, flag)| view! { <FlagCard flag=flag/> }
            />
          </div>
        </Show>
      </div>
    }
}
