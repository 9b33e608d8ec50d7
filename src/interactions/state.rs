//! Per-entity interaction records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Count for one emoji plus whether the local user contributed to it
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReactionTally {
    pub count: u32,
    pub mine: bool,
}

/// A local report against a post or message
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub reason: String,
    /// RFC 3339
    pub reported_at: String,
}

/// Interaction state for one post or message
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractionState {
    pub reactions: BTreeMap<String, ReactionTally>,
    pub bookmarked: bool,
    pub report: Option<Report>,
}

impl InteractionState {
    /// True when nothing is worth persisting
    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty() && !self.bookmarked && self.report.is_none()
    }

    pub fn is_reported(&self) -> bool {
        self.report.is_some()
    }

    /// Emojis the local user has reacted with
    pub fn my_reactions(&self) -> Vec<&str> {
        self.reactions
            .iter()
            .filter(|(_, tally)| tally.mine)
            .map(|(emoji, _)| emoji.as_str())
            .collect()
    }

    pub(crate) fn toggle_reaction(&mut self, emoji: &str) -> bool {
        let tally = self.reactions.entry(emoji.to_string()).or_default();
        let active = if tally.mine {
            tally.mine = false;
            tally.count = tally.count.saturating_sub(1);
            false
        } else {
            tally.mine = true;
            tally.count += 1;
            true
        };
        if tally.count == 0 && !tally.mine {
            self.reactions.remove(emoji);
        }
        active
    }
}
