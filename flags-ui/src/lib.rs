//! Reviewer dashboard for flagged accounts.
//!
//! Client-side rendered Leptos app: lists what the backend has flagged and
//! lets a reviewer queue an account for manual review. Nothing is ever
//! reported automatically.

pub mod actions;
pub mod app;
pub mod bridge;
pub mod browser;
pub mod config;
pub mod dto;
pub mod error;
pub mod logging;

pub mod components {
    pub mod dashboard;
    pub mod flag_card;
}

use leptos::*;

pub fn mount() {
    console_error_panic_hook::set_once();

    let config = config::UiConfig::from_build_env();
    logging::init(&config);
    if let Some(raw) = config::UiConfig::rejected_limit() {
        tracing::warn!(value = raw, "ignoring FLAGS_LIST_LIMIT");
    }
    tracing::info!(api_base = %config.api_base, "starting flag dashboard");

    let client = bridge::FlagsClient::new(bridge::FetchTransport, &config);
    mount_to_body(move || {
        provide_context(client);
        view! { <app::App/> }
    });
}
