//! Deterministic rule-based utterance classifier.
//!
//! Approval detection is an explicit allow-list plus a bounded sentiment
//! fallback; section targeting is a cue-keyword scan with a configurable
//! default for cue-less utterances. Fully offline; also serves as the
//! degradation path for the LLM-backed classifier.

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;

use rhythms_core::{Draft, Section};

use crate::classifier::{PendingUpdate, UtteranceClassifier};

/// Exact-match approval phrases, compared after normalization (lowercase,
/// punctuation stripped, whitespace collapsed).
const APPROVAL_PHRASES: &[&str] = &[
    "looks good",
    "looks good to me",
    "lgtm",
    "yes",
    "yep",
    "yeah",
    "ship it",
    "send it",
    "approved",
    "approve",
    "all good",
    "perfect",
    "that's everything",
    "thats everything",
    "that's all",
    "thats all",
    "that's it",
    "thats it",
    "nothing else",
    "nothing to add",
    "done",
    "all done",
    "i'm done",
    "im done",
    "good to go",
    "finalize",
    "finalize it",
    "submit",
    "submit it",
    "👍",
    "✅",
    "🚀",
    "👌",
];

/// Vocabulary for the sentiment fallback: a short utterance made entirely of
/// these words, containing at least one core affirmative, is approval.
const AFFIRMATIVE_WORDS: &[&str] = &[
    "looks", "sounds", "good", "great", "perfect", "nice", "awesome", "fine", "ok", "okay",
    "yes", "yep", "yeah", "sure", "ready", "thanks", "thank", "you", "that's", "thats", "all",
    "everything", "it", "me", "to",
];

const CORE_AFFIRMATIVES: &[&str] = &[
    "good", "great", "perfect", "nice", "awesome", "fine", "ok", "okay", "yes", "yep", "yeah",
    "sure", "ready",
];

const MAX_FALLBACK_WORDS: usize = 4;

pub struct RuleClassifier {
    default_section: Section,
    blocker_cues: Regex,
    accomplishment_cues: Regex,
    plan_cues: Regex,
    strip_patterns: Vec<Regex>,
}

impl RuleClassifier {
    pub fn new(default_section: Section) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).with_context(|| format!("invalid cue pattern: {pattern}"))
        };

        Ok(Self {
            default_section,
            blocker_cues: compile(
                r"\b(blockers?|blocked|blocking|stuck|waiting|impediments?|on hold)\b",
            )?,
            // Past tense only: "complete the review" is a plan, "completed
            // the review" is an accomplishment.
            accomplishment_cues: compile(
                r"\b(done|completed|finished|accomplishments?|accomplished|shipped|merged|landed|fixed|delivered|wrapped up)\b",
            )?,
            plan_cues: compile(r"\b(plans?|planning|next|tomorrow|today|todo|upcoming|will)\b")?,
            strip_patterns: vec![
                compile(r"(?i)^(?:please|also|and|btw|oh|hey)[,\s]+")?,
                compile(r"(?i)^(?:can|could|would)\s+you\s+")?,
                compile(
                    r"(?i)^(?:i(?:'d|'m| am| would)?\s+)?(?:want(?:ed)?|need|would like)\s+to\s+(?:add|note|mention|say)\s*[:,-]?\s*",
                )?,
                compile(
                    r"(?i)^(?:add|note|include|put|record|mention|log)\s+(?:that\s+)?(?:(?:(?:a|an|another|the|new)\s+)?(?:blockers?|plans?|accomplishments?|items?|notes?)\b\s*)?",
                )?,
                // Leading section noun with an explicit delimiter, as left
                // over by "I want to add" phrasing: "a blocker: X" -> "X".
                compile(
                    r"(?i)^(?:(?:a|an|another|the|new)\s+)?(?:blockers?|plans?|accomplishments?)\s*[:,-]\s*",
                )?,
                compile(r"(?i)^(?:under|to|in)\s+(?:the\s+|my\s+)?(?:blockers?|plans?|accomplishments?)\s*")?,
                compile(r"(?i)^fyi\s*")?,
                compile(r"^[:,-]\s*")?,
                // Dangling demonstrative left after a stripped verb phrase
                // ("note that" -> "that").
                compile(r"(?i)^(?:that|this)\s*$")?,
            ],
        })
    }

    fn is_approval(&self, normalized: &str) -> bool {
        if normalized.is_empty() {
            return false;
        }
        if APPROVAL_PHRASES.contains(&normalized) {
            return true;
        }

        // Sentiment fallback: short, purely affirmative, at least one core
        // affirmative word. Cue vocabularies are disjoint from the
        // affirmative set, so content-bearing utterances never qualify.
        let words: Vec<&str> = normalized.split(' ').collect();
        words.len() <= MAX_FALLBACK_WORDS
            && words.iter().all(|word| AFFIRMATIVE_WORDS.contains(word))
            && words.iter().any(|word| CORE_AFFIRMATIVES.contains(word))
    }

    /// Cue scan in fixed priority order: blockers outrank accomplishments
    /// outrank plans, so mixed utterances land where losing them hurts most.
    fn detect_section(&self, normalized: &str) -> Option<Section> {
        if self.blocker_cues.is_match(normalized) {
            Some(Section::Blockers)
        } else if self.accomplishment_cues.is_match(normalized) {
            Some(Section::Accomplishments)
        } else if self.plan_cues.is_match(normalized) {
            Some(Section::Plans)
        } else {
            None
        }
    }

    /// Strip leading meta-instruction phrasing, repeatedly, until stable.
    fn clean(&self, utterance: &str) -> String {
        let mut text = utterance.trim();
        loop {
            let mut changed = false;
            for pattern in &self.strip_patterns {
                if let Some(found) = pattern.find(text)
                    && found.start() == 0
                    && found.end() > 0
                {
                    text = text[found.end()..].trim_start();
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        text.trim().to_string()
    }
}

#[async_trait]
impl UtteranceClassifier for RuleClassifier {
    async fn classify(&self, utterance: &str, _draft: &Draft) -> Result<Option<PendingUpdate>> {
        let normalized = normalize_utterance(utterance);
        if self.is_approval(&normalized) {
            return Ok(Some(PendingUpdate::Approval));
        }

        let section = self
            .detect_section(&normalized)
            .unwrap_or(self.default_section);
        let text = self.clean(utterance);
        if text.is_empty() {
            return Ok(None);
        }

        Ok(Some(PendingUpdate::ContentUpdate { section, text }))
    }
}

/// Lowercase, strip sentence punctuation, collapse whitespace.
fn normalize_utterance(utterance: &str) -> String {
    let lowered = utterance.to_lowercase();
    let stripped: String = lowered
        .chars()
        .map(|c| if matches!(c, '.' | ',' | '!' | '?' | ';' | ':') { ' ' } else { c })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> RuleClassifier {
        RuleClassifier::new(Section::Plans).unwrap()
    }

    async fn classify(utterance: &str) -> Option<PendingUpdate> {
        classifier()
            .classify(utterance, &Draft::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_approval_allow_list() {
        for utterance in [
            "looks good",
            "Looks good!",
            "LGTM",
            "yes",
            "that's everything",
            "ship it",
            "👍",
            "All done.",
        ] {
            assert_eq!(
                classify(utterance).await,
                Some(PendingUpdate::Approval),
                "expected approval for {utterance:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_approval_sentiment_fallback() {
        assert_eq!(classify("sounds great, thanks").await, Some(PendingUpdate::Approval));
        assert_eq!(classify("ok perfect").await, Some(PendingUpdate::Approval));
    }

    #[tokio::test]
    async fn test_long_positive_sentence_is_not_approval() {
        let update = classify("great progress, next I will polish the release notes").await;
        assert!(matches!(
            update,
            Some(PendingUpdate::ContentUpdate { .. })
        ));
    }

    #[tokio::test]
    async fn test_blocker_utterance_scenario() {
        let update = classify("add a blocker: waiting for test computer").await;
        assert_eq!(
            update,
            Some(PendingUpdate::ContentUpdate {
                section: Section::Blockers,
                text: "waiting for test computer".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_note_that_prefix_stripped() {
        let update = classify("note that the deploy is stuck on approvals").await;
        assert_eq!(
            update,
            Some(PendingUpdate::ContentUpdate {
                section: Section::Blockers,
                text: "the deploy is stuck on approvals".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_accomplishment_cue() {
        let update = classify("also finished the billing migration").await;
        assert_eq!(
            update,
            Some(PendingUpdate::ContentUpdate {
                section: Section::Accomplishments,
                text: "finished the billing migration".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_plan_cue() {
        let update = classify("tomorrow I'll review the open PRs").await;
        assert!(matches!(
            update,
            Some(PendingUpdate::ContentUpdate { section: Section::Plans, .. })
        ));
    }

    #[tokio::test]
    async fn test_no_cue_defaults_to_plans() {
        let update = classify("polish the release notes").await;
        assert!(matches!(
            update,
            Some(PendingUpdate::ContentUpdate { section: Section::Plans, .. })
        ));
    }

    #[tokio::test]
    async fn test_no_cue_respects_configured_default() {
        let classifier = RuleClassifier::new(Section::Blockers).unwrap();
        let update = classifier
            .classify("the staging environment", &Draft::default())
            .await
            .unwrap();
        assert!(matches!(
            update,
            Some(PendingUpdate::ContentUpdate { section: Section::Blockers, .. })
        ));
    }

    #[tokio::test]
    async fn test_blockers_outrank_other_cues() {
        let update = classify("finished the fix but blocked on the release pipeline").await;
        assert!(matches!(
            update,
            Some(PendingUpdate::ContentUpdate { section: Section::Blockers, .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_utterance_is_noop() {
        assert_eq!(classify("").await, None);
        assert_eq!(classify("   ").await, None);
    }

    #[tokio::test]
    async fn test_bare_meta_prefix_is_noop() {
        assert_eq!(classify("add a blocker:").await, None);
        assert_eq!(classify("note that").await, None);
    }

    #[tokio::test]
    async fn test_mixed_praise_with_content_is_update() {
        let update = classify("looks good but add a blocker: waiting on security review").await;
        assert!(matches!(
            update,
            Some(PendingUpdate::ContentUpdate { section: Section::Blockers, .. })
        ));
    }

    #[test]
    fn test_normalize_utterance() {
        assert_eq!(normalize_utterance("  Looks   Good!! "), "looks good");
        assert_eq!(normalize_utterance("that's everything."), "that's everything");
    }

    #[test]
    fn test_clean_table() {
        let c = classifier();
        assert_eq!(c.clean("add a blocker: waiting for CI"), "waiting for CI");
        assert_eq!(c.clean("please also note that the VPN is flaky"), "the VPN is flaky");
        assert_eq!(c.clean("to plans: write the RFC"), "write the RFC");
        assert_eq!(
            c.clean("I want to add a blocker: waiting on security review"),
            "waiting on security review"
        );
        assert_eq!(c.clean("fyi the demo moved to Friday"), "the demo moved to Friday");
        assert_eq!(c.clean("add a blocker:"), "");
    }
}
