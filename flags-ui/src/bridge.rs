use crate::config::UiConfig;
use crate::dto::{FlagKey, ReportAck};
use flag_registry::Listing;
use crate::error::ApiError;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response};

/// Bytes that would end or reshape a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One HTTP exchange with no request body. Any response the server produced
/// is `Ok`, whatever its status.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, method: Method, url: &str) -> Result<RawResponse, ApiError>;
}

/// `window.fetch`, for the browser build.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn send(&self, method: Method, url: &str) -> Result<RawResponse, ApiError> {
        let window = web_sys::window().ok_or_else(|| ApiError::Unavailable("window".into()))?;

        let init = RequestInit::new();
        init.set_method(method.as_str());
        let request = Request::new_with_str_and_init(url, &init)
            .map_err(|e| ApiError::Network(format!("build request: {}", js_error(&e))))?;
        request
            .headers()
            .set("Accept", "application/json")
            .map_err(|e| ApiError::Network(format!("set headers: {}", js_error(&e))))?;

        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ApiError::Network(js_error(&e)))?;
        let response: Response = value
            .dyn_into()
            .map_err(|_| ApiError::Unavailable("fetch did not resolve to a Response".into()))?;

        let text = response
            .text()
            .map_err(|e| ApiError::Network(format!("read body: {}", js_error(&e))))?;
        let body = JsFuture::from(text)
            .await
            .map_err(|e| ApiError::Network(format!("read body: {}", js_error(&e))))?
            .as_string()
            .unwrap_or_default();

        Ok(RawResponse {
            status: response.status(),
            body,
        })
    }
}

fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

pub fn encode_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

/// Typed calls against the review backend.
#[derive(Clone, Debug)]
pub struct FlagsClient<T> {
    transport: T,
    base: String,
    list_limit: Option<u32>,
}

pub type ApiClient = FlagsClient<FetchTransport>;

impl<T: Transport> FlagsClient<T> {
    pub fn new(transport: T, config: &UiConfig) -> Self {
        Self {
            transport,
            base: config.api_base.clone(),
            list_limit: config.list_limit,
        }
    }

    pub fn flags_url(&self) -> String {
        match self.list_limit {
            Some(limit) => format!("{}/api/flags?limit={limit}", self.base),
            None => format!("{}/api/flags", self.base),
        }
    }

    pub fn report_url(&self, key: &FlagKey) -> String {
        format!(
            "{}/api/report/{}/{}",
            self.base,
            encode_segment(&key.platform),
            encode_segment(&key.handle)
        )
    }

    async fn call(&self, method: Method, url: &str) -> Result<RawResponse, ApiError> {
        let response = self.transport.send(method, url).await?;
        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                path: url.to_string(),
            });
        }
        Ok(response)
    }

    /// The current list, with entries that could not be shown split out.
    pub async fn fetch_flags(&self) -> Result<Listing, ApiError> {
        let response = self.call(Method::Get, &self.flags_url()).await?;
        Ok(flag_registry::parse_flags(&response.body)?)
    }

    /// Queues the flag for manual review. The acknowledgement body is
    /// optional; a 2xx without a readable one still counts.
    pub async fn report_flag(&self, key: &FlagKey) -> Result<Option<ReportAck>, ApiError> {
        let response = self.call(Method::Post, &self.report_url(key)).await?;
        Ok(serde_json::from_str(&response.body).ok())
    }
}
