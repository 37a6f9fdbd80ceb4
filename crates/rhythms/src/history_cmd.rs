use anyhow::Result;

use rhythms_core::OutputFormat;

use crate::project::{load_config, open_store, resolve_project_root};

pub fn handle_history(days: u32, cd: Option<String>, output_format: OutputFormat) -> Result<()> {
    let project_root = resolve_project_root(cd)?;
    let config = load_config(&project_root)?;
    let store = open_store(&config);

    let snapshots = store.history(days)?;

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&snapshots)?);
        }
        OutputFormat::Text => {
            if snapshots.is_empty() {
                println!("no standups recorded in the last {days} day(s)");
                return Ok(());
            }
            for snapshot in snapshots {
                let submitted = if snapshot.submitted { "submitted" } else { "draft" };
                println!("=== {} ({submitted}) ===", snapshot.date);
                println!("{}\n", snapshot.draft().render());
            }
        }
    }

    Ok(())
}

pub fn handle_blockers(cd: Option<String>, output_format: OutputFormat) -> Result<()> {
    let project_root = resolve_project_root(cd)?;
    let config = load_config(&project_root)?;
    let store = open_store(&config);

    let blockers = store.unresolved_blockers()?;

    match output_format {
        OutputFormat::Json => {
            let payload: Vec<_> = blockers
                .iter()
                .map(|(date, bullet)| serde_json::json!({"date": date, "bullet": bullet}))
                .collect();
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Text => {
            if blockers.is_empty() {
                println!("no unresolved blockers on record");
                return Ok(());
            }
            for (date, bullet) in blockers {
                println!("{date}  {bullet}");
            }
        }
    }

    Ok(())
}
