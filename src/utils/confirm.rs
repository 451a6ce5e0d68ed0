//! Yes/no confirmation before creating a new index.

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{BufRead, Write};

/// Asks the user a yes/no question. Called once, before the pipeline starts.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Prompt on stderr, read one line from stdin. Only `y` / `yes` (any case) count as yes.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let label = format!("[{}]", env!("CARGO_PKG_NAME")).cyan().bold();
        let mut stderr = std::io::stderr();
        write!(stderr, "{} {} [y/N]: ", label, prompt).context("write prompt")?;
        stderr.flush().context("flush prompt")?;
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read confirmation")?;
        Ok(is_yes(&line))
    }
}

/// `--yes`: never prompts.
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(self(prompt))
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
