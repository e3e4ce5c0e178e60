//! Reporting back to the GitHub Actions runner.
//!
//! Failures are announced with the `::error::` workflow command and step
//! outputs are appended to the file named by `GITHUB_OUTPUT`.

use std::{fs::OpenOptions, io::Write, path::Path};

use anyhow::{Context, Result};

/// Delimiter for multi-line output values. Must not occur in a value.
const OUTPUT_DELIMITER: &str = "REACTION_TAGGER_EOF";

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Renders the workflow command that marks the step as failed with
/// `message`.
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Appends `name<<DELIM` blocks for each output to `path`.
pub fn write_outputs(path: &Path, outputs: &[(&str, &str)]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open output file '{}'", path.display()))?;

    for (name, value) in outputs {
        if value.lines().any(|line| line == OUTPUT_DELIMITER) {
            anyhow::bail!("Output '{}' contains the output delimiter", name);
        }
        writeln!(file, "{}<<{}", name, OUTPUT_DELIMITER)?;
        writeln!(file, "{}", value)?;
        writeln!(file, "{}", OUTPUT_DELIMITER)?;
    }

    Ok(())
}
