//! Hover latency instrumentation.
//!
//! Rows are collected once at attach time. Entering a row records a start
//! instant, waits for the row's paint delay, applies the hovered class and
//! stores the elapsed time as the latest hover latency.

use crate::config::HarnessConfig;
use crate::state::MeasurementState;
use core::time::Duration;
use probe_dom::{Document, DomError, NodeId};
use tokio::time::{Instant, sleep};

#[derive(Debug)]
pub struct HoverInstrumentor {
    /// Instrumented rows with their paint delay, in attach order.
    rows: Vec<(NodeId, Duration)>,
    hovered_class: String,
    track_leave: bool,
}

impl HoverInstrumentor {
    /// Attach to every row currently in `document`.
    pub fn attach(document: &Document, config: &HarnessConfig) -> Self {
        let rows: Vec<(NodeId, Duration)> = document
            .query_selector_all(document.root(), &config.contract.item)
            .into_iter()
            .enumerate()
            .map(|(index, row)| (row, config.hover_delay(index)))
            .collect();
        log::debug!("hover instrumentation attached to {} rows", rows.len());
        Self {
            rows,
            hovered_class: config.contract.hovered_class.clone(),
            track_leave: config.track_leave,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.rows.iter().map(|(row, _)| *row)
    }

    /// The instrumented row containing `target` (inclusive), with its paint delay.
    fn row_for(&self, document: &Document, target: NodeId) -> Option<(NodeId, Duration)> {
        let mut candidate = Some(target);
        while let Some(node) = candidate {
            if let Some(entry) = self.rows.iter().find(|(row, _)| *row == node) {
                return Some(*entry);
            }
            candidate = document.parent(node);
        }
        None
    }

    /// Handle a pointer entering `target`. Returns the recorded latency in
    /// milliseconds, or `None` when `target` is not inside an instrumented row.
    ///
    /// # Errors
    /// Propagates tree errors from toggling the hovered class.
    pub async fn pointer_enter(
        &self,
        document: &mut Document,
        state: &mut MeasurementState,
        target: NodeId,
    ) -> Result<Option<f64>, DomError> {
        let Some((row, delay)) = self.row_for(document, target) else {
            return Ok(None);
        };
        let start = Instant::now();
        if !delay.is_zero() {
            sleep(delay).await;
        }
        document.add_class(row, &self.hovered_class)?;
        let latency = start.elapsed().as_secs_f64() * 1000.0;
        state.record_hover_latency(latency);
        log::debug!("hover latency {latency:.3}ms");
        Ok(Some(latency))
    }

    /// Handle a pointer leaving `target`. Returns whether a hovered state was cleared.
    ///
    /// # Errors
    /// Propagates tree errors from toggling the hovered class.
    pub fn pointer_leave(&self, document: &mut Document, target: NodeId) -> Result<bool, DomError> {
        if !self.track_leave {
            return Ok(false);
        }
        let Some((row, _)) = self.row_for(document, target) else {
            return Ok(false);
        };
        let was_hovered = document.has_class(row, &self.hovered_class);
        document.remove_class(row, &self.hovered_class)?;
        Ok(was_hovered)
    }
}
