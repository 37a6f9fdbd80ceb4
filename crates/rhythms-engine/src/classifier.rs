use anyhow::Result;
use async_trait::async_trait;

use rhythms_core::{Draft, Section};

/// Structured result of classifying one operator utterance. Applied to the
/// draft and discarded; never retained in state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingUpdate {
    /// The operator signed off on the draft as-is.
    Approval,
    /// New or corrected content for one section. `text` is cleaned of
    /// meta-instruction phrasing and guaranteed non-empty.
    ContentUpdate { section: Section, text: String },
}

/// Classification seam for the reconciliation loop.
///
/// `Ok(None)` means the utterance carried no usable signal (empty after
/// cleaning); the loop re-prompts without touching the draft.
#[async_trait]
pub trait UtteranceClassifier: Send + Sync {
    async fn classify(&self, utterance: &str, draft: &Draft) -> Result<Option<PendingUpdate>>;
}
