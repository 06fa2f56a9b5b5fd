//! Configuration for the instrumentation harness.
//!
//! Settings can be constructed programmatically (`HarnessConfig::default()` plus
//! field updates) or loaded from `PROBE_*` environment variables. Unparseable
//! values fall back to their defaults.

use crate::contract::DomContract;
use core::time::Duration;
use std::env;

/// How the harness waits between content-ready and the DOM snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleStrategy {
    /// Fixed delay of `settle_delay_ms`.
    Delay,
    /// Wait for the next frame boundary of `frame_budget_ms`.
    NextFrame,
}

/// Which parts of a style rule form its collision key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionKeyPolicy {
    /// The selector text alone.
    Selector,
    /// `selector|declarations`, so identical selectors with different bodies do not collide.
    SelectorAndDeclarations,
}

/// Collision count reported when the style sheet list cannot be enumerated.
pub const DEFAULT_COLLISION_FALLBACK: u32 = 4;

/// Runtime configuration for the harness.
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    /// Wait strategy before the snapshot
    pub settle: SettleStrategy,
    /// Delay used by [`SettleStrategy::Delay`], in milliseconds
    pub settle_delay_ms: u64,
    /// Frame length used by [`SettleStrategy::NextFrame`], in milliseconds (minimum 1ms)
    pub frame_budget_ms: u64,
    /// Collision dedup key policy
    pub collision_key: CollisionKeyPolicy,
    /// Count reported when sheet enumeration fails
    pub collision_fallback: u32,
    /// Base delay before the hovered state is painted, in milliseconds
    pub hover_delay_ms: u64,
    /// Additional hover delay per row index, in milliseconds
    pub hover_step_ms: u64,
    /// Whether pointer-leave clears the hovered state
    pub track_leave: bool,
    /// Viewport width used for layout, in px
    pub viewport_width: f64,
    /// Selectors and attribute names the harness expects in the page
    pub contract: DomContract,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            settle: SettleStrategy::Delay,
            settle_delay_ms: 100,
            frame_budget_ms: 16,
            collision_key: CollisionKeyPolicy::SelectorAndDeclarations,
            collision_fallback: DEFAULT_COLLISION_FALLBACK,
            hover_delay_ms: 0,
            hover_step_ms: 0,
            track_leave: true,
            viewport_width: 1024.0,
            contract: DomContract::default(),
        }
    }
}

impl HarnessConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `PROBE_SETTLE`: `delay` or `frame` (default: `delay`)
    /// - `PROBE_SETTLE_MS`: settle delay in milliseconds (default: 100)
    /// - `PROBE_FRAME_BUDGET_MS`: frame length in milliseconds (default: 16, minimum 1)
    /// - `PROBE_COLLISION_KEY`: `selector` or `selector+declarations` (default: `selector+declarations`)
    /// - `PROBE_COLLISION_FALLBACK`: count used when sheets cannot be enumerated (default: 4)
    /// - `PROBE_HOVER_DELAY_MS` / `PROBE_HOVER_STEP_MS`: hover paint delay (default: 0 / 0)
    /// - `PROBE_TRACK_LEAVE`: set to "0" to keep rows hovered after the pointer leaves
    /// - `PROBE_VIEWPORT_WIDTH`: viewport width in px (default: 1024)
    ///
    /// # Returns
    ///
    /// A new `HarnessConfig` populated from the environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let number = |key: &str, default: u64| {
            lookup(key)
                .and_then(|val| val.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };
        let flag = |key: &str, default: bool| match lookup(key).as_deref().map(str::trim) {
            Some("1" | "true") => true,
            Some("0" | "false") => false,
            _ => default,
        };

        let settle = match lookup("PROBE_SETTLE").as_deref().map(str::trim) {
            Some("frame" | "raf") => SettleStrategy::NextFrame,
            _ => SettleStrategy::Delay,
        };
        let collision_key = match lookup("PROBE_COLLISION_KEY").as_deref().map(str::trim) {
            Some("selector") => CollisionKeyPolicy::Selector,
            _ => CollisionKeyPolicy::SelectorAndDeclarations,
        };
        let viewport_width = lookup("PROBE_VIEWPORT_WIDTH")
            .and_then(|val| val.trim().parse::<f64>().ok())
            .filter(|width| width.is_finite() && *width > 0.0)
            .unwrap_or(defaults.viewport_width);

        Self {
            settle,
            settle_delay_ms: number("PROBE_SETTLE_MS", defaults.settle_delay_ms),
            frame_budget_ms: number("PROBE_FRAME_BUDGET_MS", defaults.frame_budget_ms).max(1),
            collision_key,
            collision_fallback: u32::try_from(number(
                "PROBE_COLLISION_FALLBACK",
                u64::from(defaults.collision_fallback),
            ))
            .unwrap_or(u32::MAX),
            hover_delay_ms: number("PROBE_HOVER_DELAY_MS", defaults.hover_delay_ms),
            hover_step_ms: number("PROBE_HOVER_STEP_MS", defaults.hover_step_ms),
            track_leave: flag("PROBE_TRACK_LEAVE", defaults.track_leave),
            viewport_width,
            contract: defaults.contract,
        }
    }

    /// Settings matching the delayed-hover page variant: selector-only collision
    /// keys, a 48ms hover delay growing by 4ms per row, sticky hover and a
    /// 100ms settle delay.
    #[must_use]
    pub fn delayed_hover() -> Self {
        Self {
            collision_key: CollisionKeyPolicy::Selector,
            hover_delay_ms: 48,
            hover_step_ms: 4,
            track_leave: false,
            ..Self::default()
        }
    }

    /// Get the settle delay as a `Duration`.
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Get the frame budget as a `Duration`.
    #[must_use]
    pub const fn frame_budget(&self) -> Duration {
        let millis = if self.frame_budget_ms < 1 {
            1
        } else {
            self.frame_budget_ms
        };
        Duration::from_millis(millis)
    }

    /// Hover paint delay for the row at `index`.
    #[must_use]
    pub fn hover_delay(&self, index: usize) -> Duration {
        let step = self
            .hover_step_ms
            .saturating_mul(u64::try_from(index).unwrap_or(u64::MAX));
        Duration::from_millis(self.hover_delay_ms.saturating_add(step))
    }
}
