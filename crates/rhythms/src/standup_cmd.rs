use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use rhythms_activity::{
    CodeHostEntry, TrackerIssue, normalize_code_host, normalize_tracker, sample,
};
use rhythms_config::RhythmsConfig;
use rhythms_core::{ActivityRecord, Draft, OutputFormat, Section};
use rhythms_engine::{
    CycleOutcome, LlmClassifier, ReconciliationCycle, RuleClassifier, UtteranceClassifier,
    synthesize,
};
use rhythms_memory::{MemorySnapshot, carry_over};

use crate::console::ConsoleChat;
use crate::project::{load_config, open_store, resolve_project_root};

/// Raw activity file shape: one list per source, both optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ActivityPayload {
    code_host: Vec<CodeHostEntry>,
    tracker: Vec<TrackerIssue>,
}

pub async fn handle_standup(
    sample: bool,
    activity: Option<PathBuf>,
    date: Option<NaiveDate>,
    cd: Option<String>,
    output_format: OutputFormat,
) -> Result<i32> {
    let project_root = resolve_project_root(cd)?;
    let config = load_config(&project_root)?;
    let store = open_store(&config);
    let date = date.unwrap_or_else(|| Utc::now().date_naive());

    let payload = load_activity(sample, activity)?;
    let fresh = normalize_payload(&payload, config.sources.max_items_per_source);

    let mut records = fresh.clone();
    if let Some(snapshot) = store.load_latest()? {
        let carried = carry_over(&snapshot, &fresh);
        info!(
            carried = carried.len(),
            prior_date = %snapshot.date,
            "carrying unresolved items from previous cycle"
        );
        records.extend(carried);
    }

    let draft = synthesize(Draft::default(), &records);

    let default_section = Section::from_str(&config.engine.default_section)?;
    let rules = RuleClassifier::new(default_section)?;
    let classifier: Box<dyn UtteranceClassifier> = if config.classifier.llm.enabled {
        Box::new(LlmClassifier::new(
            config.classifier.llm.base_url.clone(),
            config.classifier.llm.api_key.clone(),
            &config.classifier.llm.models,
            rules,
        )?)
    } else {
        Box::new(rules)
    };

    let cycle = ReconciliationCycle::new(classifier.as_ref(), config.engine.max_rounds);
    let mut chat = ConsoleChat;

    match cycle.run(draft, &mut chat).await? {
        CycleOutcome::Finalized { draft, document } => {
            let mut snapshot = MemorySnapshot::from_draft(date, &draft);
            snapshot.submitted = true;
            store.append(&snapshot)?;
            info!(%date, bullets = draft.bullet_count(), "standup finalized and recorded");

            if let OutputFormat::Json = output_format {
                let payload = serde_json::json!({
                    "status": "finalized",
                    "date": date,
                    "draft": draft,
                    "document": document,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
            Ok(0)
        }
        CycleOutcome::Incomplete { rounds, .. } => {
            // Recoverable: nothing persisted, caller may start a new cycle.
            eprintln!("standup incomplete after {rounds} rounds without approval; nothing recorded");
            Ok(2)
        }
        CycleOutcome::Aborted => {
            eprintln!("standup aborted; nothing recorded");
            Ok(1)
        }
    }
}

fn load_activity(sample_flag: bool, activity: Option<PathBuf>) -> Result<ActivityPayload> {
    if sample_flag {
        return Ok(ActivityPayload {
            code_host: sample::sample_code_host(),
            tracker: sample::sample_tracker(),
        });
    }

    let Some(path) = activity else {
        // No source supplied: start from an empty draft and let the
        // operator fill it in over chat.
        return Ok(ActivityPayload::default());
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read activity file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse activity file: {}", path.display()))
}

fn normalize_payload(payload: &ActivityPayload, max_items: usize) -> Vec<ActivityRecord> {
    let code_host = &payload.code_host[..payload.code_host.len().min(max_items)];
    let tracker = &payload.tracker[..payload.tracker.len().min(max_items)];

    let mut records = normalize_code_host(code_host);
    records.extend(normalize_tracker(tracker));
    records
}
