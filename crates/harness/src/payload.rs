//! Payload loading.
//!
//! The page embeds its initial state as JSON inside the element named by
//! [`DomContract::payload_id`]. Loading never fails: a missing element or
//! invalid JSON yields [`Payload::default`] and the error is kept as a
//! diagnostic. Valid JSON is kept whatever its shape.

use crate::contract::DomContract;
use crate::mutation::MutationDirective;
use core::fmt::{Display, Formatter, Result as FmtResult};
use probe_dom::Document;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::error::Error;

/// The parsed payload, kept exactly as the page wrote it.
///
/// The expected shape is `{ initial_dom: { items, mutation? } }`, but any valid
/// JSON is accepted; accessors read through it and treat absent or mistyped
/// members as missing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Value);

impl Default for Payload {
    /// `{ "initial_dom": { "items": [] } }`
    fn default() -> Self {
        Self(json!({ "initial_dom": { "items": [] } }))
    }
}

impl Payload {
    /// Parse a payload from JSON text. Empty text parses as `{}`.
    ///
    /// # Errors
    /// Returns [`PayloadError::Malformed`] when the text is not valid JSON.
    pub fn from_json(text: &str) -> Result<Self, PayloadError> {
        let source = if text.trim().is_empty() { "{}" } else { text };
        serde_json::from_str(source)
            .map(Self)
            .map_err(PayloadError::Malformed)
    }

    pub const fn value(&self) -> &Value {
        &self.0
    }

    /// `initial_dom.items`, or nothing when it is absent or not an array.
    pub fn items(&self) -> &[Value] {
        self.0
            .pointer("/initial_dom/items")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// `initial_dom.mutation`, when it is a string.
    pub fn mutation(&self) -> Option<&str> {
        self.0.pointer("/initial_dom/mutation").and_then(Value::as_str)
    }

    /// The mutation directive, if the payload names one.
    pub fn mutation_directive(&self) -> Option<MutationDirective> {
        self.mutation().map(MutationDirective::parse)
    }
}

/// Why the embedded payload could not be used.
#[derive(Debug)]
pub enum PayloadError {
    /// No element with the payload id exists.
    MissingNode(String),
    /// The payload text is not valid JSON.
    Malformed(serde_json::Error),
}

impl Display for PayloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::MissingNode(id) => write!(f, "payload element #{id} not found"),
            Self::Malformed(err) => write!(f, "payload parse error: {err}"),
        }
    }
}

impl Error for PayloadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingNode(_) => None,
            Self::Malformed(err) => Some(err),
        }
    }
}

/// Result of [`load`]: always a usable payload, plus the failure if there was one.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub payload: Payload,
    pub diagnostic: Option<PayloadError>,
}

/// Read the embedded payload from `document`.
pub fn load(document: &Document, contract: &DomContract) -> LoadOutcome {
    let Some(node) = document.get_element_by_id(&contract.payload_id) else {
        log::debug!("no #{} element; using default payload", contract.payload_id);
        return LoadOutcome {
            payload: Payload::default(),
            diagnostic: Some(PayloadError::MissingNode(contract.payload_id.clone())),
        };
    };
    match Payload::from_json(&document.text_content(node)) {
        Ok(payload) => LoadOutcome {
            payload,
            diagnostic: None,
        },
        Err(err) => {
            log::warn!("{err}; using default payload");
            LoadOutcome {
                payload: Payload::default(),
                diagnostic: Some(err),
            }
        }
    }
}
