use crate::dto::Flag;
use crate::error::ApiError;
use flag_registry::export;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

const REVOKE_DELAY_MS: i32 = 10_000;

fn unavailable(what: &str, err: JsValue) -> ApiError {
    ApiError::Unavailable(format!("{what}: {err:?}"))
}

/// Blocking `window.alert`.
pub fn alert(message: &str) {
    let shown = web_sys::window().map(|w| w.alert_with_message(message));
    if !matches!(shown, Some(Ok(()))) {
        tracing::warn!(notice = message, "could not show notice");
    }
}

/// Saves the given flags as a CSV download.
pub fn download_csv(flags: &[Flag]) -> Result<(), ApiError> {
    let window = web_sys::window().ok_or_else(|| ApiError::Unavailable("window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| ApiError::Unavailable("document".into()))?;

    let parts = js_sys::Array::of1(&JsValue::from_str(&export::to_csv(flags)));
    let options = BlobPropertyBag::new();
    options.set_type("text/csv;charset=utf-8");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| unavailable("blob", e))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(|e| unavailable("object url", e))?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| unavailable("anchor", e))?
        .dyn_into()
        .map_err(|_| ApiError::Unavailable("anchor element".into()))?;
    anchor.set_href(&url);
    anchor.set_download(export::REPORT_FILE_NAME);
    anchor.click();

    // The download reads the object URL after this task ends, so it is
    // released from a later timer.
    let revoke = Closure::once_into_js(move || {
        if let Err(err) = Url::revoke_object_url(&url) {
            tracing::warn!(error = ?err, "could not revoke report url");
        }
    });
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            revoke.unchecked_ref(),
            REVOKE_DELAY_MS,
        )
        .map_err(|e| unavailable("schedule url revoke", e))?;
    tracing::info!(count = flags.len(), "exported flag report");
    Ok(())
}
