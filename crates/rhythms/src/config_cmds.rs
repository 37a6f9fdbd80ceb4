use anyhow::{Result, bail};

use rhythms_config::RhythmsConfig;
use rhythms_core::OutputFormat;

use crate::project::resolve_project_root;

pub fn handle_config_show(cd: Option<String>, output_format: OutputFormat) -> Result<()> {
    let project_root = resolve_project_root(cd)?;
    let config = RhythmsConfig::load_or_default(&project_root)?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => print!("{}", toml::to_string_pretty(&config)?),
    }
    Ok(())
}

pub fn handle_config_init(cd: Option<String>) -> Result<()> {
    let project_root = resolve_project_root(cd)?;
    let config_path = RhythmsConfig::config_path(&project_root);
    if config_path.exists() {
        bail!("config already exists: {}", config_path.display());
    }

    let written = RhythmsConfig::write_template(&project_root)?;
    println!("wrote {}", written.display());
    Ok(())
}

pub fn handle_config_validate(cd: Option<String>) -> Result<()> {
    let project_root = resolve_project_root(cd)?;
    let Some(config) = RhythmsConfig::load(&project_root)? else {
        println!(
            "no config at {}; defaults are in effect",
            RhythmsConfig::config_path(&project_root).display()
        );
        return Ok(());
    };

    let problems = config.validate();
    if problems.is_empty() {
        println!("config OK");
        return Ok(());
    }

    for problem in &problems {
        eprintln!("problem: {problem}");
    }
    bail!("{} config problem(s) found", problems.len());
}
