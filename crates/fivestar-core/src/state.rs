//! UI-agnostic popup state types
//!
//! These structures describe what each popup region shows. They are shared
//! by the terminal front-end and the headless `info` command and don't
//! depend on any specific UI framework.

use serde::{Deserialize, Serialize};

pub const SUMMARIZING_SENTINEL: &str = "(Summarizing in the background...)";
pub const SUMMARY_FAILED_SENTINEL: &str = "(Failed to summarize)";

/// A chat message in the popup's chat widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
}

/// Progress of the AI summary shown under the product description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryStatus {
    /// Nothing requested yet, no status line
    Idle,
    Summarizing,
    Failed,
    Summarized(String),
}

/// Contents of the product summary region.
///
/// The scraped lines (description, features) are kept apart from the
/// summary status so a failed summary only swaps the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRegion {
    pub lines: Vec<String>,
    pub status: SummaryStatus,
}

impl SummaryRegion {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            status: SummaryStatus::Idle,
        }
    }

    /// Scraped lines with a summary pending
    pub fn summarizing(lines: Vec<String>) -> Self {
        Self {
            lines,
            status: SummaryStatus::Summarizing,
        }
    }

    pub fn mark_summarized(&mut self, summary: String) {
        self.status = SummaryStatus::Summarized(summary);
    }

    pub fn mark_failed(&mut self) {
        self.status = SummaryStatus::Failed;
    }

    pub fn is_summarizing(&self) -> bool {
        self.status == SummaryStatus::Summarizing
    }

    /// Lines as displayed. A finished summary replaces the whole region.
    pub fn display_lines(&self) -> Vec<String> {
        match &self.status {
            SummaryStatus::Summarized(summary) => summary.lines().map(str::to_string).collect(),
            SummaryStatus::Idle => self.lines.clone(),
            SummaryStatus::Summarizing => {
                let mut lines = self.lines.clone();
                lines.push(SUMMARIZING_SENTINEL.to_string());
                lines
            }
            SummaryStatus::Failed => {
                let mut lines = self.lines.clone();
                lines.push(SUMMARY_FAILED_SENTINEL.to_string());
                lines
            }
        }
    }

    pub fn text(&self) -> String {
        match &self.status {
            SummaryStatus::Summarized(summary) => summary.clone(),
            _ => self.display_lines().join("\n"),
        }
    }
}

impl Default for SummaryRegion {
    fn default() -> Self {
        Self::new()
    }
}

/// A headed bullet list region (pros or cons)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulletRegion {
    Loading,
    Items { heading: String, items: Vec<String> },
    /// Shown verbatim: the empty-list or failure message
    Message(String),
}

impl BulletRegion {
    /// Build the region for a backend list. `label` is the plural noun
    /// ("pros", "cons") used in the heading and the empty message.
    pub fn from_items(label: &str, items: Option<Vec<String>>) -> Self {
        match items {
            Some(items) if !items.is_empty() => BulletRegion::Items {
                heading: capitalize(label),
                items,
            },
            _ => BulletRegion::Message(format!("No {} found", label)),
        }
    }

    pub fn failed(label: &str) -> Self {
        BulletRegion::Message(format!("Failed to fetch {}", label))
    }

    pub fn text(&self) -> String {
        match self {
            BulletRegion::Loading => String::new(),
            BulletRegion::Items { heading, items } => {
                let mut text = heading.clone();
                for item in items {
                    text.push_str("\n• ");
                    text.push_str(item);
                }
                text
            }
            BulletRegion::Message(message) => message.clone(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
