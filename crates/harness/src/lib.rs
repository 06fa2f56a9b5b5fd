//! UI instrumentation harness.
//!
//! A [`Harness`] attaches to a [`probe_dom::Document`], loads the embedded
//! payload, applies the one-shot list mutation, annotates subtasks, counts
//! style rule collisions, measures hover latency and snapshots the task list
//! once the page has settled. A test driver then reads layout records and
//! global measurements through typed accessors or the named query surface.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use probe_harness::{Harness, HarnessConfig};
//!
//! let page = probe_dom::Document::parse_html("<ul data-task-list></ul>")?;
//! let harness = Harness::boot(page, HarnessConfig::from_env()).await;
//! let globals = harness.query("__measureGlobal")?;
//! # let _ = globals;
//! # Ok(())
//! # }
//! ```

#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

pub mod collisions;
pub mod config;
pub mod contract;
pub mod events;
pub mod facade;
pub mod harness;
pub mod instrument;
pub mod layout_report;
pub mod mutation;
pub mod payload;
pub mod placeholders;
pub mod scheduler;
pub mod snapshot;
pub mod state;
pub mod subtasks;

pub use config::{CollisionKeyPolicy, HarnessConfig, SettleStrategy};
pub use contract::DomContract;
pub use events::PointerEvent;
pub use facade::{Accessor, GlobalMeasurements, QueryError};
pub use harness::{Harness, Phase};
pub use layout_report::LayoutRecord;
pub use mutation::{MutationDirective, MutationOutcome, Priority};
pub use payload::{Payload, PayloadError};
pub use snapshot::SnapshotNode;
pub use state::{DEFAULT_HOVER_LATENCY_MS, MeasurementState};
