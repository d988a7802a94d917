//! Parser for the judge's plain-text verdict.
//!
//! Expected shape:
//!
//! ```text
//! Descriptions:
//! - Alice: a robot with suspicious elbows
//! - Bob: possibly a robot, possibly a toaster
//! Winner: Alice
//! Reason: the elbows
//! ```

use super::models::JudgeEntry;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Verdict {
    pub summary: String,
    pub winner_name: String,
}

impl Verdict {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.winner_name.is_empty()
    }

    /// Id of the first drawer whose display name matches the winner, or an
    /// empty string when nobody matches
    pub fn winner_id(&self, entries: &[JudgeEntry]) -> String {
        if self.winner_name.is_empty() {
            return String::new();
        }
        entries
            .iter()
            .find(|e| e.drawer_name == self.winner_name)
            .map(|e| e.drawer_id.clone())
            .unwrap_or_default()
    }
}

pub fn parse_verdict(text: &str) -> Verdict {
    let mut summary = String::new();
    let mut winner_name = String::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("Descriptions:") {
            // Anything before the marker is preamble
            summary.clear();
        } else if trimmed.starts_with("- ") || trimmed.starts_with("Reason:") {
            summary.push_str(line);
            summary.push('\n');
        } else if trimmed.starts_with("Winner:") {
            winner_name = trimmed
                .split_once(':')
                .map(|(_, name)| name.trim().to_string())
                .unwrap_or_default();
        }
    }

    Verdict {
        summary: summary.trim().to_string(),
        winner_name,
    }
}
