use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Standup report section
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Accomplishments,
    Blockers,
    Plans,
}

impl Section {
    pub const ALL: [Section; 3] = [Self::Accomplishments, Self::Blockers, Self::Plans];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accomplishments => "accomplishments",
            Self::Blockers => "blockers",
            Self::Plans => "plans",
        }
    }

    /// Category whose records land in this section (inverse of
    /// [`Category::section`]). Used when applying operator updates through
    /// the synthesizer.
    pub fn category(&self) -> Category {
        match self {
            Self::Accomplishments => Category::Completed,
            Self::Blockers => Category::Blocked,
            Self::Plans => Category::InProgress,
        }
    }

    /// Markdown heading used in rendered drafts.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Accomplishments => "## Accomplishments",
            Self::Blockers => "## Blockers",
            Self::Plans => "## Plans",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Section {
    type Err = crate::EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accomplishments" | "accomplishment" => Ok(Self::Accomplishments),
            "blockers" | "blocker" => Ok(Self::Blockers),
            "plans" | "plan" => Ok(Self::Plans),
            other => Err(crate::EngineError::InvalidSection(other.to_string())),
        }
    }
}

/// Activity category assigned by the normalizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Completed,
    InProgress,
    Blocked,
}

impl Category {
    /// Draft section this category lands in.
    pub fn section(&self) -> Section {
        match self {
            Self::Completed => Section::Accomplishments,
            Self::Blocked => Section::Blockers,
            Self::InProgress => Section::Plans,
        }
    }
}

/// Where an activity record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    CodeHost,
    Tracker,
    /// Carried over from a previous cycle's snapshot.
    Memory,
    /// Typed by the operator during reconciliation.
    Chat,
}

/// One unit of observed work, already categorized.
///
/// Invariant: `url` is non-empty for CodeHost/Tracker records; Memory records
/// keep the original link when one existed, Chat records usually have none.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    pub source: RecordSource,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub needs_verification: bool,
}

impl ActivityRecord {
    pub fn new(title: impl Into<String>, url: impl Into<String>, source: RecordSource, category: Category) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            source,
            category,
            timestamp: None,
            needs_verification: false,
        }
    }
}

/// Output format for CLI responses
#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
