//! Interactive input for required values the user left out, and `.env` loading.

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::Path;

/// Load `.env` from `dir` into the process environment (e.g. `AWS_PROFILE`, `AWS_REGION`).
/// Variables already set are not overridden. Returns true if a file was loaded.
pub fn load_dotenv(dir: &Path) -> bool {
    let env_path = dir.join(".env");
    if !env_path.is_file() {
        return false;
    }
    match dotenvy::from_path(&env_path) {
        Ok(()) => {
            log::debug!("Loaded environment from {}", env_path.display());
            true
        }
        Err(e) => {
            log::warn!("{}: {}", env_path.display(), e);
            false
        }
    }
}

/// Read one non-empty line from `input`, re-asking until the answer is non-empty.
/// Returns None on EOF.
pub fn read_nonempty<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<Option<String>> {
    let label = format!("[{}]", env!("CARGO_PKG_NAME")).cyan().bold();
    loop {
        write!(output, "{} {}", label, prompt).context("write prompt")?;
        output.flush().context("flush prompt")?;
        let mut line = String::new();
        if input.read_line(&mut line).context("read answer")? == 0 {
            return Ok(None);
        }
        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(Some(answer.to_string()));
        }
        writeln!(output, "{}", "A value is required.".yellow()).context("write prompt")?;
    }
}

/// Prompt on the terminal (stdin/stderr) for a required value.
pub fn prompt_required(prompt: &str) -> Result<Option<String>> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stderr();
    read_nonempty(&mut input, &mut output, prompt)
}
