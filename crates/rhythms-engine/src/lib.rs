//! Draft synthesis and interactive reconciliation engine.
//!
//! Merges categorized activity records (fresh tracker activity plus memory
//! carry-overs) into the three-section standup draft, classifies free-form
//! operator utterances into draft updates or an approval signal, and runs the
//! confirmation loop that gates finalization on explicit approval.

mod classifier;
mod cycle;
mod llm_client;
mod rules;
mod synthesize;

pub use classifier::{PendingUpdate, UtteranceClassifier};
pub use cycle::{COMPLETENESS_PROMPT, CycleOutcome, ReconciliationCycle, StandupChat};
pub use llm_client::{LlmClassifier, ModelRotator};
pub use rules::RuleClassifier;
pub use synthesize::{format_bullet, synthesize};
