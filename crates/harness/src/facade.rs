//! The externally queryable measurement surface.
//!
//! A test driver reads measurements either through the typed accessors on
//! [`crate::Harness`] or by name through [`crate::Harness::query`], which
//! returns JSON shaped like the page globals (`__captureLayout()`,
//! `__measureGlobal()`, `__caseData`).

use crate::snapshot::SnapshotNode;
use crate::state::MeasurementState;
use core::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Deserialize, Serialize};
use std::error::Error;

/// `{ cssCollisions, hoverLatency, domSnapshot }`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalMeasurements {
    pub css_collisions: u32,
    pub hover_latency: f64,
    pub dom_snapshot: Option<SnapshotNode>,
}

impl From<&MeasurementState> for GlobalMeasurements {
    fn from(state: &MeasurementState) -> Self {
        Self {
            css_collisions: state.css_collision_count(),
            hover_latency: state.last_hover_latency(),
            dom_snapshot: state.dom_snapshot().cloned(),
        }
    }
}

/// Read the latest measurements; defaults before anything ran.
pub fn measure_global(state: &MeasurementState) -> GlobalMeasurements {
    GlobalMeasurements::from(state)
}

/// Named accessors of the query surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accessor {
    CaptureLayout,
    MeasureGlobal,
    /// The loaded payload.
    CaseData,
}

impl Accessor {
    /// Resolve an accessor name, with or without the `__` global prefix.
    ///
    /// # Errors
    /// Returns [`QueryError::UnknownAccessor`] for any other name.
    pub fn from_name(name: &str) -> Result<Self, QueryError> {
        match name.strip_prefix("__").unwrap_or(name) {
            "captureLayout" => Ok(Self::CaptureLayout),
            "measureGlobal" => Ok(Self::MeasureGlobal),
            "caseData" => Ok(Self::CaseData),
            _ => Err(QueryError::UnknownAccessor(name.to_owned())),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::CaptureLayout => "captureLayout",
            Self::MeasureGlobal => "measureGlobal",
            Self::CaseData => "caseData",
        }
    }
}

/// Errors from the named query surface.
#[derive(Debug)]
pub enum QueryError {
    UnknownAccessor(String),
    Serialize(serde_json::Error),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::UnknownAccessor(name) => write!(f, "unknown accessor {name:?}"),
            Self::Serialize(err) => write!(f, "failed to serialize measurement: {err}"),
        }
    }
}

impl Error for QueryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownAccessor(_) => None,
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err)
    }
}
