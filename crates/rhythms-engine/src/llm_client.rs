//! OpenAI-compatible backend for utterance classification.
//!
//! Speaks the chat-completions protocol against any compatible endpoint,
//! rotating across a failover model list on rate/quota exhaustion. Every
//! failure path (transport, all models cooling down, unparseable response)
//! degrades to the embedded rule classifier so the reconciliation loop never
//! sees a classification error.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::warn;

use rhythms_core::{Draft, Section};

use crate::classifier::{PendingUpdate, UtteranceClassifier};
use crate::rules::RuleClassifier;

const DEFAULT_COOLDOWN: Duration = Duration::from_secs(600);

const SYSTEM_PROMPT: &str = "You classify one operator reply in a standup confirmation chat. \
Given the current draft and the reply, respond with strict JSON only, no prose: \
{\"kind\":\"approval\"} when the reply's dominant sentiment is agreement or completeness; \
{\"kind\":\"content_update\",\"section\":\"accomplishments\"|\"blockers\"|\"plans\",\"text\":\"<content with meta phrasing like 'add a blocker:' removed>\"} \
when the reply adds or corrects report content; \
{\"kind\":\"noop\"} when the reply carries no usable content.";

pub struct LlmClassifier {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
    rotator: Mutex<ModelRotator>,
    fallback: RuleClassifier,
}

impl LlmClassifier {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        models_csv: &str,
        fallback: RuleClassifier,
    ) -> Result<Self> {
        let models: Vec<String> = models_csv
            .split(',')
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        if models.is_empty() {
            bail!("at least one model is required for LlmClassifier");
        }

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            rotator: Mutex::new(ModelRotator::new(models)),
            fallback,
        })
    }

    async fn run_chat_completion(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        loop {
            let model = {
                let mut rotator = self
                    .rotator
                    .lock()
                    .map_err(|_| anyhow!("model rotator poisoned"))?;
                if rotator.all_exhausted() {
                    bail!("all classifier llm models are currently in cooldown");
                }
                rotator.next_available().to_string()
            };

            let url = format!("{}/chat/completions", self.base_url);
            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&json!({
                    "model": model,
                    "messages": [
                        {"role": "system", "content": system_prompt},
                        {"role": "user", "content": user_prompt}
                    ],
                    "temperature": 0.0
                }))
                .send()
                .await
                .with_context(|| format!("classifier llm request failed for model {model}"))?;

            let status = response.status();
            let headers = response.headers().clone();
            let body = response
                .text()
                .await
                .with_context(|| format!("failed to read response body for model {model}"))?;

            if status.is_success() {
                return parse_completion_content(&body);
            }

            if is_rate_or_quota_error(status, &body) {
                let cooldown = parse_retry_after(&headers).unwrap_or(DEFAULT_COOLDOWN);
                let has_next = {
                    let mut rotator = self
                        .rotator
                        .lock()
                        .map_err(|_| anyhow!("model rotator poisoned"))?;
                    rotator.mark_exhausted(&model, cooldown);
                    !rotator.all_exhausted()
                };

                if has_next {
                    warn!(
                        "classifier LLM failover: {} rate-limited (cooldown {}s)",
                        model,
                        cooldown.as_secs()
                    );
                    continue;
                }

                bail!(
                    "all classifier llm models exhausted after rate/quota limit; last model: {model}, status: {status}"
                );
            }

            return Err(anyhow!(
                "classifier llm request failed for model {model}: status {status}, body {body}"
            ));
        }
    }
}

#[async_trait]
impl UtteranceClassifier for LlmClassifier {
    async fn classify(&self, utterance: &str, draft: &Draft) -> Result<Option<PendingUpdate>> {
        let user_prompt = format!(
            "Current draft:\n{}\n\nOperator reply:\n{}",
            draft.render(),
            utterance
        );

        match self.run_chat_completion(SYSTEM_PROMPT, &user_prompt).await {
            Ok(content) => match parse_verdict(&content) {
                Some(update) => Ok(update),
                None => {
                    warn!("unparseable classifier llm response; falling back to rules");
                    self.fallback.classify(utterance, draft).await
                }
            },
            Err(error) => {
                warn!(%error, "classifier llm unavailable; falling back to rules");
                self.fallback.classify(utterance, draft).await
            }
        }
    }
}

#[derive(Deserialize)]
struct WireVerdict {
    kind: String,
    #[serde(default)]
    section: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

/// Map an LLM response to a classification. Outer `None` means the response
/// was not usable and the caller should fall back to the rule classifier.
fn parse_verdict(content: &str) -> Option<Option<PendingUpdate>> {
    let verdict: WireVerdict = match serde_json::from_str(content) {
        Ok(verdict) => verdict,
        // Tolerate prose or fenced output around the JSON object.
        Err(_) => {
            let start = content.find('{')?;
            let end = content.rfind('}')?;
            serde_json::from_str(&content[start..=end]).ok()?
        }
    };

    match verdict.kind.as_str() {
        "approval" => Some(Some(PendingUpdate::Approval)),
        "noop" => Some(None),
        "content_update" => {
            let section = Section::from_str(verdict.section.as_deref()?).ok()?;
            let text = verdict.text?.trim().to_string();
            if text.is_empty() {
                // Empty content is a no-op, not a draft mutation.
                return Some(None);
            }
            Some(Some(PendingUpdate::ContentUpdate { section, text }))
        }
        _ => None,
    }
}

/// Round-robin over the configured model list, skipping models in cooldown.
#[derive(Debug, Clone)]
pub struct ModelRotator {
    models: Vec<String>,
    cooldowns: HashMap<String, Instant>,
    current_index: usize,
}

impl ModelRotator {
    pub fn new(models: Vec<String>) -> Self {
        assert!(
            !models.is_empty(),
            "ModelRotator requires at least one model"
        );
        Self {
            models,
            cooldowns: HashMap::new(),
            current_index: 0,
        }
    }

    /// Get next available model (skip models still in cooldown)
    pub fn next_available(&mut self) -> &str {
        self.purge_expired();
        let total = self.models.len();

        for _ in 0..total {
            let index = self.current_index % total;
            self.current_index = (self.current_index + 1) % total;
            let model = &self.models[index];
            if !self.in_cooldown(model) {
                return model;
            }
        }

        &self.models[self.current_index % total]
    }

    /// Mark a model as exhausted with cooldown duration
    pub fn mark_exhausted(&mut self, model: &str, cooldown: Duration) {
        self.cooldowns
            .insert(model.to_string(), Instant::now() + cooldown);
    }

    /// Check if all models are in cooldown
    pub fn all_exhausted(&self) -> bool {
        let now = Instant::now();
        self.models.iter().all(|model| {
            self.cooldowns
                .get(model)
                .is_some_and(|cooldown_until| *cooldown_until > now)
        })
    }

    fn in_cooldown(&self, model: &str) -> bool {
        let now = Instant::now();
        self.cooldowns
            .get(model)
            .is_some_and(|cooldown_until| *cooldown_until > now)
    }

    fn purge_expired(&mut self) {
        let now = Instant::now();
        self.cooldowns.retain(|_, until| *until > now);
    }
}

fn is_rate_or_quota_error(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }

    let body_lower = body.to_ascii_lowercase();
    body_lower.contains("rate_limit")
        || body_lower.contains("quota")
        || body_lower.contains("insufficient_quota")
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(seconds) = raw.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let retry_at = DateTime::parse_from_rfc2822(raw).ok()?.with_timezone(&Utc);
    let now = Utc::now();
    let seconds = (retry_at - now).num_seconds().max(0) as u64;
    Some(Duration::from_secs(seconds))
}

fn parse_completion_content(body: &str) -> Result<String> {
    let value: Value =
        serde_json::from_str(body).context("failed to parse completion response JSON")?;
    let content = value
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow!("missing choices[0].message.content in completion response"))?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_model_rotator_basic() {
        let mut rotator = ModelRotator::new(vec!["model-a".to_string(), "model-b".to_string()]);
        assert_eq!(rotator.next_available(), "model-a");
    }

    #[test]
    fn test_model_rotator_failover() {
        let mut rotator = ModelRotator::new(vec!["model-a".to_string(), "model-b".to_string()]);
        let first = rotator.next_available().to_string();
        rotator.mark_exhausted(&first, Duration::from_secs(60));
        assert_eq!(rotator.next_available(), "model-b");
    }

    #[test]
    fn test_model_rotator_cooldown_expiry() {
        let mut rotator = ModelRotator::new(vec!["model-a".to_string(), "model-b".to_string()]);
        rotator.mark_exhausted("model-a", Duration::from_secs(0));
        assert_eq!(rotator.next_available(), "model-a");
    }

    #[test]
    fn test_model_rotator_all_exhausted() {
        let mut rotator = ModelRotator::new(vec!["model-a".to_string(), "model-b".to_string()]);
        rotator.mark_exhausted("model-a", Duration::from_secs(60));
        rotator.mark_exhausted("model-b", Duration::from_secs(60));
        assert!(rotator.all_exhausted());
    }

    #[test]
    fn test_retry_after_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("120"));

        let retry_after = parse_retry_after(&headers);
        assert_eq!(retry_after, Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_is_rate_or_quota_error() {
        assert!(is_rate_or_quota_error(StatusCode::TOO_MANY_REQUESTS, ""));
        assert!(is_rate_or_quota_error(
            StatusCode::FORBIDDEN,
            r#"{"error":"insufficient_quota"}"#
        ));
        assert!(!is_rate_or_quota_error(StatusCode::BAD_REQUEST, "nope"));
    }

    #[test]
    fn test_parse_verdict_approval() {
        assert_eq!(
            parse_verdict(r#"{"kind":"approval"}"#),
            Some(Some(PendingUpdate::Approval))
        );
    }

    #[test]
    fn test_parse_verdict_content_update() {
        let verdict = parse_verdict(
            r#"{"kind":"content_update","section":"blockers","text":"waiting for test computer"}"#,
        );
        assert_eq!(
            verdict,
            Some(Some(PendingUpdate::ContentUpdate {
                section: Section::Blockers,
                text: "waiting for test computer".to_string(),
            }))
        );
    }

    #[test]
    fn test_parse_verdict_noop() {
        assert_eq!(parse_verdict(r#"{"kind":"noop"}"#), Some(None));
    }

    #[test]
    fn test_parse_verdict_fenced_json() {
        let fenced = "```json\n{\"kind\":\"approval\"}\n```";
        assert_eq!(parse_verdict(fenced), Some(Some(PendingUpdate::Approval)));
    }

    #[test]
    fn test_parse_verdict_empty_text_is_noop() {
        let verdict =
            parse_verdict(r#"{"kind":"content_update","section":"plans","text":"  "}"#);
        assert_eq!(verdict, Some(None));
    }

    #[test]
    fn test_parse_verdict_bad_section_falls_back() {
        let verdict =
            parse_verdict(r#"{"kind":"content_update","section":"retro","text":"x"}"#);
        assert_eq!(verdict, None);
    }

    #[test]
    fn test_parse_verdict_garbage_falls_back() {
        assert_eq!(parse_verdict("sure, sounds good!"), None);
    }

    #[test]
    fn test_parse_completion_content() {
        let body = r#"{"choices":[{"message":{"content":"{\"kind\":\"approval\"}"}}]}"#;
        assert_eq!(
            parse_completion_content(body).unwrap(),
            r#"{"kind":"approval"}"#
        );
    }

    #[test]
    fn test_new_requires_models() {
        let fallback = RuleClassifier::new(Section::Plans).unwrap();
        assert!(LlmClassifier::new("https://api.test/v1", "key", " , ", fallback).is_err());
    }
}
