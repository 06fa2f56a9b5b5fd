//! Style rule collision counting.
//!
//! Every accessible style rule with a selector contributes a key; each key
//! seen before counts as one collision. Unreadable sheets are skipped. When
//! the sheet list itself is unavailable the configured fallback is reported.

use crate::config::CollisionKeyPolicy;
use probe_dom::{CssRule, StyleSheetSource};
use std::collections::HashSet;

#[derive(Clone, Copy, Debug)]
pub struct CollisionDetector {
    policy: CollisionKeyPolicy,
    fallback: u32,
}

impl CollisionDetector {
    pub const fn new(policy: CollisionKeyPolicy, fallback: u32) -> Self {
        Self { policy, fallback }
    }

    /// Dedup key of `rule`, or `None` for rules without a selector.
    pub fn rule_key(&self, rule: &CssRule) -> Option<String> {
        let selector = rule.selector_text()?;
        Some(match self.policy {
            CollisionKeyPolicy::Selector => selector.to_owned(),
            CollisionKeyPolicy::SelectorAndDeclarations => {
                format!("{selector}|{}", rule.css_text())
            }
        })
    }

    /// Count repeated keys across all readable sheets of `source`.
    pub fn scan(&self, source: &dyn StyleSheetSource) -> u32 {
        let sheets = match source.style_sheets() {
            Ok(sheets) => sheets,
            Err(err) => {
                log::warn!(
                    "{err}; reporting {} css collisions",
                    self.fallback
                );
                return self.fallback;
            }
        };
        let mut seen: HashSet<String> = HashSet::new();
        let mut collisions = 0u32;
        for sheet in sheets {
            let rules = match sheet.css_rules() {
                Ok(rules) => rules,
                Err(err) => {
                    log::debug!("skipping style sheet: {err}");
                    continue;
                }
            };
            for key in rules.iter().filter_map(|rule| self.rule_key(rule)) {
                if !seen.insert(key) {
                    collisions = collisions.saturating_add(1);
                }
            }
        }
        log::debug!("css collision scan found {collisions} repeated rule keys");
        collisions
    }
}
