//! Reconciliation loop: present, ingest one utterance, apply, re-present.
//!
//! One cycle owns its draft exclusively. The loop suspends at each
//! `present` call (the engine's only suspension point) and resumes when the
//! transport hands back an utterance. Only an approval-classified utterance
//! finalizes; an abort discards the draft, and the round bound turns an
//! unbounded session into a recoverable incomplete outcome.

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use rhythms_core::{ActivityRecord, Draft, RecordSource, Section};

use crate::classifier::{PendingUpdate, UtteranceClassifier};
use crate::synthesize::synthesize;

/// Prompt appended to every intermediate draft presentation.
pub const COMPLETENESS_PROMPT: &str =
    "Anything to add or change? Reply \"looks good\" to finalize.";

/// Human-interaction seam for one reconciliation cycle.
#[async_trait]
pub trait StandupChat: Send {
    /// Present the current draft plus completeness prompt; return the next
    /// utterance, or `None` when the operator aborts the cycle.
    async fn present(&mut self, rendered: &str) -> Result<Option<String>>;

    /// Deliver the finalized document (`FINAL STANDUP:` prefixed).
    async fn deliver_final(&mut self, rendered: &str) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CycleState {
    Presenting,
    Updating,
    Finalized,
}

/// How one cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// Operator approved; `document` is the rendered final form.
    Finalized { draft: Draft, document: String },
    /// Round bound hit without approval. The draft is returned for
    /// inspection but must not be persisted as finalized.
    Incomplete { draft: Draft, rounds: u32 },
    /// Operator aborted; partial progress is discarded.
    Aborted,
}

pub struct ReconciliationCycle<'a> {
    classifier: &'a dyn UtteranceClassifier,
    max_rounds: u32,
}

impl<'a> ReconciliationCycle<'a> {
    pub fn new(classifier: &'a dyn UtteranceClassifier, max_rounds: u32) -> Self {
        Self {
            classifier,
            max_rounds,
        }
    }

    /// Run the loop to completion over `chat`.
    pub async fn run(&self, draft: Draft, chat: &mut dyn StandupChat) -> Result<CycleOutcome> {
        let mut draft = draft;
        let mut state = CycleState::Presenting;
        let mut rounds: u32 = 0;

        loop {
            debug!(?state, rounds, "presenting draft");
            let rendered = format!("{}\n\n{COMPLETENESS_PROMPT}", draft.render());
            let Some(utterance) = chat.present(&rendered).await? else {
                debug!(rounds, "cycle aborted at presenting state");
                return Ok(CycleOutcome::Aborted);
            };
            rounds += 1;

            match self.classifier.classify(&utterance, &draft).await? {
                Some(PendingUpdate::Approval) => {
                    state = CycleState::Finalized;
                    debug!(?state, rounds, "approval received");
                    let document = draft.render_final();
                    chat.deliver_final(&document).await?;
                    return Ok(CycleOutcome::Finalized { draft, document });
                }
                Some(PendingUpdate::ContentUpdate { section, text }) => {
                    state = CycleState::Updating;
                    debug!(?state, section = %section, "applying content update");
                    draft = synthesize(draft, &[chat_record(section, text)]);
                    state = CycleState::Presenting;
                }
                None => {
                    debug!(rounds, "utterance empty after cleaning; re-prompting");
                }
            }

            if rounds >= self.max_rounds {
                warn!(rounds, "round limit reached without approval");
                return Ok(CycleOutcome::Incomplete { draft, rounds });
            }
        }
    }
}

/// Wrap cleaned operator content as a record so it flows through the same
/// merge rules as tracker activity.
fn chat_record(section: Section, text: String) -> ActivityRecord {
    ActivityRecord::new(text, "", RecordSource::Chat, section.category())
}
