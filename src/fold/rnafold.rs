use super::{executable, PredictedStructure, StructurePredictor};
use crate::utils::Result;
use std::io::Write;
use std::process::{Command, Stdio};

const RNAFOLD_ENV_BIN: &str = "RNAMOTIF_RNAFOLD_BIN";
const DEFAULT_RNAFOLD_BIN: &str = "RNAfold";

/// Minimum free energy folding with ViennaRNA's `RNAfold`.
pub struct RnaFold {
    executable: String,
}

impl RnaFold {
    pub fn new() -> Self {
        Self::with_executable(executable(RNAFOLD_ENV_BIN, DEFAULT_RNAFOLD_BIN))
    }

    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl Default for RnaFold {
    fn default() -> Self {
        Self::new()
    }
}

impl StructurePredictor for RnaFold {
    fn name(&self) -> &str {
        "RNAfold"
    }

    fn predict(&self, sequence: &[u8], constraint: Option<&str>) -> Result<Vec<PredictedStructure>> {
        let mut command = Command::new(&self.executable);
        command.arg("--noPS");
        if constraint.is_some() {
            command.arg("-C");
        }
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| format!("Could not spawn {}: {}", self.executable, e))?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| format!("Failed to open stdin of {}", self.executable))?;
            let mut input = sequence.to_vec();
            input.push(b'\n');
            if let Some(constraint) = constraint {
                input.extend_from_slice(constraint.as_bytes());
                input.push(b'\n');
            }
            stdin
                .write_all(&input)
                .map_err(|e| format!("Error writing to {} stdin: {}", self.executable, e))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| format!("Error waiting for {}: {}", self.executable, e))?;
        if !output.status.success() {
            return Err(format!(
                "{} exited with status {}: {}",
                self.executable,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        let structure = parse_rnafold_output(&String::from_utf8_lossy(&output.stdout))?;
        Ok(vec![structure])
    }
}

/// Reads the structure line, `<dot-bracket> (<energy>)`, that follows the
/// echoed sequence.
fn parse_rnafold_output(stdout: &str) -> Result<PredictedStructure> {
    let line = stdout
        .lines()
        .filter(|l| !l.starts_with('>') && !l.trim().is_empty())
        .nth(1)
        .ok_or_else(|| "RNAfold output has no structure line".to_string())?;
    let (dot_bracket, energy) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| format!("Unexpected RNAfold structure line: {}", line))?;
    let score = energy
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("Invalid RNAfold energy '{}': {}", energy.trim(), e))?;
    Ok(PredictedStructure {
        dot_bracket: dot_bracket.to_string(),
        score,
    })
}
