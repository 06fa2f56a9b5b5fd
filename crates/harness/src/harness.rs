//! Harness lifecycle: attach, content-ready, settle, then on-demand queries.

use crate::collisions::CollisionDetector;
use crate::config::{HarnessConfig, SettleStrategy};
use crate::events::PointerEvent;
use crate::facade::{self, Accessor, GlobalMeasurements, QueryError};
use crate::instrument::HoverInstrumentor;
use crate::layout_report::{self, LayoutRecord};
use crate::mutation::{MutationApplicator, MutationOutcome};
use crate::payload::{self, Payload, PayloadError};
use crate::scheduler::FrameScheduler;
use crate::snapshot::{self, SnapshotNode};
use crate::state::MeasurementState;
use crate::{placeholders, subtasks};
use probe_dom::Document;
use serde_json::Value;
use tokio::time::sleep;

/// Lifecycle phase of the page the harness is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Payload loaded; content-ready work has not run.
    Attached,
    /// Content-ready work ran; no snapshot yet.
    ContentLoaded,
    /// At least one settle pass completed.
    Settled,
}

/// The instrumentation harness attached to one page.
///
/// All work runs sequentially on the caller's task. Internal failures are
/// logged and collapsed to defaults; the measurement accessors never fail.
#[derive(Debug)]
pub struct Harness {
    document: Document,
    config: HarnessConfig,
    payload: Payload,
    load_diagnostic: Option<PayloadError>,
    state: MeasurementState,
    phase: Phase,
    collisions: CollisionDetector,
    mutation: MutationApplicator,
    mutation_outcome: Option<MutationOutcome>,
    instrumentor: Option<HoverInstrumentor>,
    frames: FrameScheduler,
}

impl Harness {
    /// Attach to `document` and load its payload.
    pub fn attach(document: Document, config: HarnessConfig) -> Self {
        let loaded = payload::load(&document, &config.contract);
        Self {
            collisions: CollisionDetector::new(config.collision_key, config.collision_fallback),
            frames: FrameScheduler::new(config.frame_budget()),
            document,
            payload: loaded.payload,
            load_diagnostic: loaded.diagnostic,
            state: MeasurementState::default(),
            phase: Phase::Attached,
            mutation: MutationApplicator::new(),
            mutation_outcome: None,
            instrumentor: None,
            config,
        }
    }

    /// Parse `html` and attach to the resulting page.
    ///
    /// # Errors
    /// Returns an error if the page cannot be parsed.
    pub fn from_html(html: &str, config: HarnessConfig) -> anyhow::Result<Self> {
        Ok(Self::attach(Document::parse_html(html)?, config))
    }

    /// Attach, run content-ready work and settle.
    pub async fn boot(document: Document, config: HarnessConfig) -> Self {
        let mut harness = Self::attach(document, config);
        harness.content_loaded();
        harness.settle().await;
        harness
    }

    /// Content-ready work: placeholders, the mutation, subtask metadata, hover
    /// instrumentation and the collision scan. Runs once; later calls are no-ops.
    pub fn content_loaded(&mut self) {
        if self.phase != Phase::Attached {
            log::debug!("content-ready work already ran");
            return;
        }
        self.phase = Phase::ContentLoaded;
        let contract = &self.config.contract;

        if let Err(err) = placeholders::fill(&mut self.document, contract) {
            log::warn!("placeholder fill failed: {err}");
        }
        let directive = self.payload.mutation_directive();
        match self
            .mutation
            .apply(&mut self.document, contract, directive.as_ref())
        {
            Ok(outcome) => self.mutation_outcome = Some(outcome),
            Err(err) => log::warn!("mutation failed: {err}"),
        }
        if let Err(err) = subtasks::normalize(&mut self.document, contract) {
            log::warn!("subtask normalization failed: {err}");
        }
        self.instrumentor = Some(HoverInstrumentor::attach(&self.document, &self.config));
        self.scan_collisions();
    }

    /// Re-run the collision scan and store its count.
    pub fn scan_collisions(&mut self) -> u32 {
        let count = self.collisions.scan(&self.document);
        self.state.record_collisions(count);
        count
    }

    /// Wait for the page to settle, then snapshot the list.
    ///
    /// Runs content-ready work first if it has not run, so the mutation always
    /// precedes the snapshot.
    pub async fn settle(&mut self) {
        if self.phase == Phase::Attached {
            self.content_loaded();
        }
        match self.config.settle {
            SettleStrategy::Delay => sleep(self.config.settle_delay()).await,
            SettleStrategy::NextFrame => self.frames.next_frame().await,
        }
        self.capture_snapshot();
        self.phase = Phase::Settled;
    }

    /// Snapshot the list container now, replacing any earlier snapshot.
    pub fn capture_snapshot(&mut self) -> Option<&SnapshotNode> {
        let captured = snapshot::capture_list(&self.document, &self.config.contract);
        if captured.is_none() {
            log::debug!("no list container to snapshot");
        }
        self.state.record_snapshot(captured);
        self.state.dom_snapshot()
    }

    /// Deliver a pointer event. Returns the recorded latency for a hover
    /// that landed on an instrumented row.
    pub async fn dispatch(&mut self, event: PointerEvent) -> Option<f64> {
        let Some(instrumentor) = &self.instrumentor else {
            log::debug!("{event:?} before content-ready; ignoring");
            return None;
        };
        let target = event.target();
        match event {
            PointerEvent::Enter(_) => instrumentor
                .pointer_enter(&mut self.document, &mut self.state, target)
                .await
                .unwrap_or_else(|err| {
                    log::warn!("hover handling failed: {err}");
                    None
                }),
            PointerEvent::Leave(_) => {
                if let Err(err) = instrumentor.pointer_leave(&mut self.document, target) {
                    log::warn!("leave handling failed: {err}");
                }
                None
            }
        }
    }

    /// Layout records for every row, from a layout of the page as it is now.
    pub fn capture_layout(&self) -> Vec<LayoutRecord> {
        layout_report::capture_layout(
            &self.document,
            &self.config.contract,
            self.config.viewport_width,
        )
    }

    pub fn measure_global(&self) -> GlobalMeasurements {
        facade::measure_global(&self.state)
    }

    /// JSON value of a named accessor (`captureLayout`, `measureGlobal`,
    /// `caseData`, optionally `__`-prefixed).
    ///
    /// # Errors
    /// Fails for unknown names or if serialization fails.
    pub fn query(&self, name: &str) -> Result<Value, QueryError> {
        let accessor = Accessor::from_name(name)?;
        log::debug!("query {}", accessor.name());
        let value = match accessor {
            Accessor::CaptureLayout => serde_json::to_value(self.capture_layout())?,
            Accessor::MeasureGlobal => serde_json::to_value(self.measure_global())?,
            Accessor::CaseData => serde_json::to_value(&self.payload)?,
        };
        Ok(value)
    }

    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for page scripts running alongside the harness.
    pub const fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Why the embedded payload was replaced by the default, if it was.
    pub const fn load_diagnostic(&self) -> Option<&PayloadError> {
        self.load_diagnostic.as_ref()
    }

    pub const fn state(&self) -> &MeasurementState {
        &self.state
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn mutation_outcome(&self) -> Option<&MutationOutcome> {
        self.mutation_outcome.as_ref()
    }
}
