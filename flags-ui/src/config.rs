use tracing::level_filters::LevelFilter;

pub const PAGE_TITLE: &str = "Eumenides — Metadata Monitor";

/// Settings baked in at build time. The bundle runs in a browser, so the
/// usual process environment is read by the compiler instead of at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct UiConfig {
    pub api_base: String,
    pub list_limit: Option<u32>,
    pub log_level: LevelFilter,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            list_limit: None,
            log_level: LevelFilter::INFO,
        }
    }
}

impl UiConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("FLAGS_API_BASE"),
            option_env!("FLAGS_LIST_LIMIT"),
            option_env!("FLAGS_LOG_LEVEL"),
        )
    }

    pub fn from_values(
        api_base: Option<&str>,
        list_limit: Option<&str>,
        log_level: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            api_base: api_base
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            list_limit: list_limit
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|n| *n > 0),
            log_level: log_level
                .and_then(|v| v.trim().parse::<LevelFilter>().ok())
                .unwrap_or(defaults.log_level),
        }
    }

    /// Raw limit setting that did not parse, for a startup warning.
    pub fn rejected_limit() -> Option<&'static str> {
        let raw = option_env!("FLAGS_LIST_LIMIT")?;
        let parsed = Self::from_values(None, Some(raw), None).list_limit;
        (parsed.is_none() && !raw.trim().is_empty()).then_some(raw)
    }
}
