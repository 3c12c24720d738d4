//! Schema for flagged accounts served by the review backend.
//!
//! The backend owns scoring and persistence; this crate only describes the
//! records it hands out and the few derived values a reviewer sees.

mod error;
pub mod export;

pub use error::RegistryError;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Why an account was flagged. The backend sends either a list of short
/// reasons or one free-form string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reasons {
    List(Vec<String>),
    Scalar(String),
}

impl Reasons {
    /// Reasons joined for display, `", "` between list entries.
    pub fn joined(&self, sep: &str) -> String {
        match self {
            Reasons::List(items) => items.join(sep),
            Reasons::Scalar(text) => text.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub platform: String,
    pub handle: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub risk_score: Option<serde_json::Number>,
    #[serde(default)]
    pub reasons: Option<Reasons>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
}

impl Flag {
    pub fn key(&self) -> FlagKey {
        FlagKey {
            platform: self.platform.clone(),
            handle: self.handle.clone(),
        }
    }

    /// Card title: the display name, or the handle when the name is missing
    /// or empty.
    pub fn title(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.handle,
        }
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn risk_score_text(&self) -> String {
        self.risk_score
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub fn reasons_text(&self) -> String {
        self.reasons
            .as_ref()
            .map(|r| r.joined(", "))
            .unwrap_or_default()
    }
}

/// Identity of a flag within one fetched list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlagKey {
    pub platform: String,
    pub handle: String,
}

impl fmt::Display for FlagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.platform, self.handle)
    }
}

pub fn validate_flag(flag: &Flag) -> Result<(), RegistryError> {
    if flag.platform.trim().is_empty() {
        return Err(RegistryError::MissingField { field: "platform" });
    }
    if flag.handle.trim().is_empty() {
        return Err(RegistryError::MissingField { field: "handle" });
    }
    Ok(())
}

/// Decodes a `/api/flags` body. Only a body that is not a JSON array fails as
/// a whole; an entry that does not decode as a [`Flag`] lands in
/// [`Listing::rejected`] and the rest of the list survives.
pub fn parse_flags(body: &str) -> Result<Listing, RegistryError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(body)?;

    let mut decoded = Vec::with_capacity(entries.len());
    let mut malformed = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Flag>(entry) {
            Ok(flag) => decoded.push(flag),
            Err(err) => malformed.push(RegistryError::Entry {
                index,
                reason: err.to_string(),
            }),
        }
    }

    let mut listing = build_listing(decoded);
    malformed.append(&mut listing.rejected);
    listing.rejected = malformed;
    Ok(listing)
}

/// A fetched list ready for keyed rendering, plus whatever had to be left out.
#[derive(Clone, Debug, Default)]
pub struct Listing {
    pub flags: Vec<Flag>,
    pub rejected: Vec<RegistryError>,
}

/// Keeps server order. Entries without a platform or handle are rejected, and
/// for a repeated key only the first entry survives.
pub fn build_listing(raw: Vec<Flag>) -> Listing {
    let mut seen = HashSet::with_capacity(raw.len());
    let mut listing = Listing {
        flags: Vec::with_capacity(raw.len()),
        rejected: Vec::new(),
    };

    for flag in raw {
        if let Err(err) = validate_flag(&flag) {
            listing.rejected.push(err);
            continue;
        }
        let key = flag.key();
        if !seen.insert(key.clone()) {
            listing.rejected.push(RegistryError::DuplicateKey(key));
            continue;
        }
        listing.flags.push(flag);
    }
    listing
}
