use serde::{Deserialize, Serialize};

use crate::format;

/// A repository activity record as served by the webhook receiver.
///
/// Every field tolerates absence. The receiver stores whatever the webhook
/// delivered, and unknown fields (such as the storage layer's `_id`) are
/// ignored on decode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default)]
    pub from_branch: String,
    #[serde(default)]
    pub to_branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Parsed view of the wire `action` string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventAction {
    Push,
    PullRequest,
    Merge,
}

impl EventAction {
    /// Parse the wire string. Unrecognized values map to `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PUSH" => Some(Self::Push),
            "PULL_REQUEST" => Some(Self::PullRequest),
            "MERGE" => Some(Self::Merge),
            _ => None,
        }
    }
}

impl RepoEvent {
    /// Parsed action, when the wire string is one of the known kinds.
    pub fn action(&self) -> Option<EventAction> {
        self.action.as_deref().and_then(EventAction::parse)
    }

    /// Card label for the action: the raw wire string, `unknown` when absent.
    pub fn action_label(&self) -> &str {
        self.action.as_deref().unwrap_or("unknown")
    }

    /// Card label for the delivery id, `N/A` when absent.
    pub fn request_id_label(&self) -> &str {
        self.request_id.as_deref().unwrap_or("N/A")
    }

    /// Formatted card timestamp. See [`format::format_timestamp`].
    pub fn formatted_time(&self) -> String {
        format::format_timestamp(self.timestamp.as_deref())
    }

    /// One-line human-readable summary for the card body.
    ///
    /// Unknown or absent actions produce an empty message; the card then
    /// shows only its header and delivery id.
    pub fn message(&self) -> String {
        let time = self.formatted_time();
        match self.action() {
            Some(EventAction::Push) => {
                format!("{} pushed to {} on {}", self.author, self.to_branch, time)
            }
            Some(EventAction::PullRequest) => format!(
                "{} submitted a pull request from {} to {} on {}",
                self.author, self.from_branch, self.to_branch, time
            ),
            Some(EventAction::Merge) => format!(
                "{} merged branch {} to {} on {}",
                self.author, self.from_branch, self.to_branch, time
            ),
            None => String::new(),
        }
    }
}
