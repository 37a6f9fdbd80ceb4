//! Stdin/stdout chat transport for interactive reconciliation.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use async_trait::async_trait;

use rhythms_engine::StandupChat;

/// Literal command that aborts the cycle; EOF (Ctrl-D) aborts as well.
const ABORT_COMMAND: &str = "/abort";

#[derive(Default)]
pub struct ConsoleChat;

#[async_trait]
impl StandupChat for ConsoleChat {
    async fn present(&mut self, rendered: &str) -> Result<Option<String>> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "\n{rendered}").context("failed to write draft")?;
        write!(stdout, "> ").context("failed to write prompt")?;
        stdout.flush().context("failed to flush prompt")?;
        drop(stdout);

        let mut line = String::new();
        let bytes = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read utterance")?;

        if bytes == 0 {
            // EOF: operator walked away.
            return Ok(None);
        }

        let utterance = line.trim_end_matches(['\n', '\r']).to_string();
        if utterance.trim() == ABORT_COMMAND {
            return Ok(None);
        }
        Ok(Some(utterance))
    }

    async fn deliver_final(&mut self, rendered: &str) -> Result<()> {
        println!("\n{rendered}");
        Ok(())
    }
}
