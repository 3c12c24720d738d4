//! What the dashboard does against the backend, kept apart from the views so
//! it can run against any [`Transport`].

use crate::bridge::{FlagsClient, Transport};
use crate::dto::{Flag, FlagKey};
use leptos::*;
use tracing::{debug, error, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    ReviewConfirmed,
    ReviewFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::ReviewConfirmed => "Marked for manual review (no automatic reporting).",
            Notice::ReviewFailed => "Failed to mark for review.",
        }
    }
}

/// Replaces `flags` with the backend's current list. A failure is logged and
/// leaves the previous list in place. Returns whether the list was replaced.
pub async fn load_flags<T: Transport>(
    client: &FlagsClient<T>,
    flags: WriteSignal<Vec<Flag>>,
) -> bool {
    let listing = match client.fetch_flags().await {
        Ok(listing) => listing,
        Err(err) => {
            error!(error = %err, "failed to load flags");
            return false;
        }
    };

    for rejected in &listing.rejected {
        warn!(reason = %rejected, "skipping flag entry");
    }
    debug!(count = listing.flags.len(), "flags loaded");
    flags.set(listing.flags);
    true
}

pub async fn mark_for_review<T: Transport>(client: &FlagsClient<T>, key: &FlagKey) -> Notice {
    match client.report_flag(key).await {
        Ok(ack) => {
            if let Some(ack) = ack {
                debug!(status = %ack.status, platform = %ack.platform, handle = %ack.handle, "review acknowledged");
            }
            info!(flag = %key, "marked for manual review");
            Notice::ReviewConfirmed
        }
        Err(err) => {
            error!(flag = %key, error = %err, "failed to mark for review");
            Notice::ReviewFailed
        }
    }
}

/// Runs one list load unless another is still pending on the same dashboard.
/// `None` means the call was skipped; otherwise the result of [`load_flags`].
pub async fn refresh<T: Transport>(
    client: &FlagsClient<T>,
    flags: WriteSignal<Vec<Flag>>,
    loading: InFlight,
) -> Option<bool> {
    if !loading.try_begin() {
        debug!("flag list load already in flight");
        return None;
    }
    let replaced = load_flags(client, flags).await;
    loading.finish();
    Some(replaced)
}

/// Marker for a request that has not settled yet. Views bind `disabled` to
/// [`InFlight::is_active`].
#[derive(Clone, Copy)]
pub struct InFlight(RwSignal<bool>);

impl InFlight {
    pub fn new() -> Self {
        Self(create_rw_signal(false))
    }

    pub fn is_active(&self) -> bool {
        self.0.get()
    }

    fn try_begin(&self) -> bool {
        if self.0.get_untracked() {
            return false;
        }
        self.0.set(true);
        true
    }

    fn finish(&self) {
        self.0.set(false);
    }
}

impl Default for InFlight {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one report unless another is still pending for the same card, in
/// which case nothing is sent and `None` comes back.
pub async fn activate_report<T: Transport>(
    client: &FlagsClient<T>,
    key: &FlagKey,
    in_flight: InFlight,
) -> Option<Notice> {
    if !in_flight.try_begin() {
        debug!(flag = %key, "report already in flight");
        return None;
    }
    let notice = mark_for_review(client, key).await;
    in_flight.finish();
    Some(notice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{Method, RawResponse};
    use crate::config::UiConfig;
    use crate::error::ApiError;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Replays canned results in order and records every request.
    #[derive(Clone, Default)]
    struct Recorder {
        replies: Rc<RefCell<VecDeque<Result<RawResponse, ApiError>>>>,
        sent: Rc<RefCell<Vec<(Method, String)>>>,
    }

    impl Recorder {
        fn reply(self, status: u16, body: &str) -> Self {
            self.replies.borrow_mut().push_back(Ok(RawResponse {
                status,
                body: body.into(),
            }));
            self
        }

        fn fail(self) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Err(ApiError::Network("connection refused".into())));
            self
        }

        fn sent(&self) -> Vec<(Method, String)> {
            self.sent.borrow().clone()
        }
    }

    impl Transport for Recorder {
        async fn send(&self, method: Method, url: &str) -> Result<RawResponse, ApiError> {
            self.sent.borrow_mut().push((method, url.to_string()));
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("no reply queued".into())))
        }
    }

    fn client(transport: Recorder) -> FlagsClient<Recorder> {
        FlagsClient::new(transport, &UiConfig::default())
    }

    fn bob() -> FlagKey {
        FlagKey {
            platform: "twitter".into(),
            handle: "bob".into(),
        }
    }

    const TWO_FLAGS: &str = r#"[
      {"platform": "twitter", "handle": "bob", "display_name": "", "risk_score": 0.9, "reasons": ["a", "b"]},
      {"platform": "telegram", "handle": "chan", "display_name": "Channel", "risk_score": 0.4, "reasons": "solo"}
    ]"#;

    #[test]
    fn load_replaces_list_in_server_order() {
        let runtime = create_runtime();
        let transport = Recorder::default().reply(200, TWO_FLAGS);
        let (flags, set_flags) = create_signal(Vec::<Flag>::new());

        assert!(block_on(load_flags(&client(transport.clone()), set_flags)));

        let loaded = flags.get_untracked();
        let titles: Vec<&str> = loaded.iter().map(Flag::title).collect();
        assert_eq!(titles, vec!["bob", "Channel"]);
        assert_eq!(loaded[0].reasons_text(), "a, b");
        assert_eq!(loaded[1].reasons_text(), "solo");
        assert_eq!(transport.sent(), vec![(Method::Get, "/api/flags".to_string())]);
        runtime.dispose();
    }

    #[test]
    fn failed_load_keeps_empty_list() {
        let runtime = create_runtime();
        let transport = Recorder::default().fail();
        let (flags, set_flags) = create_signal(Vec::<Flag>::new());

        assert!(!block_on(load_flags(&client(transport.clone()), set_flags)));

        assert!(flags.get_untracked().is_empty());
        assert_eq!(transport.sent().len(), 1);
        runtime.dispose();
    }

    #[test]
    fn failed_refresh_keeps_stale_list() {
        let runtime = create_runtime();
        let transport = Recorder::default()
            .reply(200, TWO_FLAGS)
            .reply(503, "")
            .reply(200, "<html>not json</html>");
        let client = client(transport.clone());
        let (flags, set_flags) = create_signal(Vec::<Flag>::new());

        assert!(block_on(load_flags(&client, set_flags)));
        assert!(!block_on(load_flags(&client, set_flags)));
        assert!(!block_on(load_flags(&client, set_flags)));

        assert_eq!(flags.get_untracked().len(), 2);
        assert_eq!(transport.sent().len(), 3);
        runtime.dispose();
    }

    #[test]
    fn empty_response_clears_list() {
        let runtime = create_runtime();
        let transport = Recorder::default().reply(200, TWO_FLAGS).reply(200, "[]");
        let client = client(transport);
        let (flags, set_flags) = create_signal(Vec::<Flag>::new());

        block_on(load_flags(&client, set_flags));
        block_on(load_flags(&client, set_flags));

        assert!(flags.get_untracked().is_empty());
        runtime.dispose();
    }

    #[test]
    fn load_drops_repeated_keys() {
        let runtime = create_runtime();
        let body = r#"[
          {"platform": "twitter", "handle": "bob", "risk_score": 1},
          {"platform": "twitter", "handle": "bob", "risk_score": 2}
        ]"#;
        let transport = Recorder::default().reply(200, body);
        let (flags, set_flags) = create_signal(Vec::<Flag>::new());

        block_on(load_flags(&client(transport), set_flags));

        let loaded = flags.get_untracked();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].risk_score_text(), "1");
        runtime.dispose();
    }

    #[test]
    fn report_posts_once_and_confirms() {
        let transport = Recorder::default().reply(
            200,
            r#"{"status": "marked_for_manual_review", "platform": "twitter", "handle": "bob"}"#,
        );

        let notice = block_on(mark_for_review(&client(transport.clone()), &bob()));

        assert_eq!(notice, Notice::ReviewConfirmed);
        assert_eq!(
            notice.message(),
            "Marked for manual review (no automatic reporting)."
        );
        assert_eq!(
            transport.sent(),
            vec![(Method::Post, "/api/report/twitter/bob".to_string())]
        );
    }

    #[test]
    fn report_accepts_2xx_without_body() {
        let transport = Recorder::default().reply(204, "");
        let notice = block_on(mark_for_review(&client(transport), &bob()));
        assert_eq!(notice, Notice::ReviewConfirmed);
    }

    #[test]
    fn report_failure_shows_failure_notice() {
        let transport = Recorder::default().reply(500, "boom").fail();
        let client = client(transport.clone());

        assert_eq!(block_on(mark_for_review(&client, &bob())), Notice::ReviewFailed);
        assert_eq!(block_on(mark_for_review(&client, &bob())), Notice::ReviewFailed);
        assert_eq!(Notice::ReviewFailed.message(), "Failed to mark for review.");
        assert_eq!(transport.sent().len(), 2);
    }

    #[test]
    fn load_keeps_entries_around_a_malformed_one() {
        let runtime = create_runtime();
        let body = r#"[
          {"platform": "twitter", "handle": "bob", "risk_score": 1},
          {"platform": "twitter", "handle": null},
          {"platform": "telegram", "handle": "chan", "risk_score": 2}
        ]"#;
        let transport = Recorder::default().reply(200, body);
        let (flags, set_flags) = create_signal(Vec::<Flag>::new());

        assert!(block_on(load_flags(&client(transport), set_flags)));

        let keys: Vec<String> = flags
            .get_untracked()
            .iter()
            .map(|f| f.key().to_string())
            .collect();
        assert_eq!(keys, vec!["twitter-bob", "telegram-chan"]);
        runtime.dispose();
    }

    #[test]
    fn refresh_is_skipped_while_a_load_is_pending() {
        let runtime = create_runtime();
        let transport = Recorder::default().reply(200, TWO_FLAGS);
        let client = client(transport.clone());
        let (flags, set_flags) = create_signal(Vec::<Flag>::new());
        let loading = InFlight::new();

        assert!(loading.try_begin());
        assert!(loading.is_active());
        assert_eq!(block_on(refresh(&client, set_flags, loading)), None);
        assert!(transport.sent().is_empty());
        assert!(flags.get_untracked().is_empty());

        loading.finish();
        assert_eq!(block_on(refresh(&client, set_flags, loading)), Some(true));
        assert!(!loading.is_active());
        assert_eq!(flags.get_untracked().len(), 2);
        assert_eq!(transport.sent().len(), 1);
        runtime.dispose();
    }

    #[test]
    fn failed_refresh_releases_the_gate() {
        let runtime = create_runtime();
        let transport = Recorder::default().fail().reply(200, "[]");
        let client = client(transport.clone());
        let (_flags, set_flags) = create_signal(Vec::<Flag>::new());
        let loading = InFlight::new();

        assert_eq!(block_on(refresh(&client, set_flags, loading)), Some(false));
        assert!(!loading.is_active());
        assert_eq!(block_on(refresh(&client, set_flags, loading)), Some(true));
        assert_eq!(transport.sent().len(), 2);
        runtime.dispose();
    }

    #[test]
    fn pending_report_blocks_second_activation() {
        let runtime = create_runtime();
        let transport = Recorder::default().reply(200, "").reply(200, "");
        let client = client(transport.clone());
        let in_flight = InFlight::new();

        assert!(in_flight.try_begin());
        assert_eq!(block_on(activate_report(&client, &bob(), in_flight)), None);
        assert!(transport.sent().is_empty());

        in_flight.finish();
        assert_eq!(
            block_on(activate_report(&client, &bob(), in_flight)),
            Some(Notice::ReviewConfirmed)
        );
        assert!(!in_flight.is_active());
        assert_eq!(transport.sent().len(), 1);
        runtime.dispose();
    }
}
