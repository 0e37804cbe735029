use super::{executable, PredictedStructure, StructurePredictor};
use crate::utils::Result;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

const IPKNOT_ENV_BIN: &str = "RNAMOTIF_IPKNOT_BIN";
const DEFAULT_IPKNOT_BIN: &str = "ipknot";

/// Pseudoknot-capable folding with `ipknot`. Reads FASTA from a file and
/// reports every pseudoknot layer with its own bracket pair.
pub struct IpKnot {
    executable: String,
}

impl IpKnot {
    pub fn new() -> Self {
        Self::with_executable(executable(IPKNOT_ENV_BIN, DEFAULT_IPKNOT_BIN))
    }

    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl Default for IpKnot {
    fn default() -> Self {
        Self::new()
    }
}

impl StructurePredictor for IpKnot {
    fn name(&self) -> &str {
        "IPknot"
    }

    fn predict(&self, sequence: &[u8], constraint: Option<&str>) -> Result<Vec<PredictedStructure>> {
        if constraint.is_some() {
            log::debug!("IPknot does not take a structure constraint, ignoring it");
        }

        let write_fasta = |file: &mut NamedTempFile| -> std::io::Result<()> {
            file.write_all(b">consensus\n")?;
            file.write_all(sequence)?;
            file.write_all(b"\n")?;
            file.flush()
        };
        let mut input = NamedTempFile::new().map_err(|e| e.to_string())?;
        write_fasta(&mut input).map_err(|e| format!("Could not write IPknot input: {}", e))?;

        let output = Command::new(&self.executable)
            .arg(input.path())
            .output()
            .map_err(|e| format!("Could not spawn {}: {}", self.executable, e))?;
        if !output.status.success() {
            return Err(format!(
                "{} exited with status {}: {}",
                self.executable,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        let dot_bracket = parse_ipknot_output(&String::from_utf8_lossy(&output.stdout), sequence.len())?;
        Ok(vec![PredictedStructure {
            dot_bracket,
            score: 0.0,
        }])
    }
}

/// Last line of the FASTA-like output is the structure.
fn parse_ipknot_output(stdout: &str, expected_len: usize) -> Result<String> {
    let structure = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('>'))
        .last()
        .ok_or_else(|| "IPknot output has no structure line".to_string())?;
    if structure.len() != expected_len {
        return Err(format!(
            "IPknot structure has length {}, expected {}",
            structure.len(),
            expected_len
        ));
    }
    Ok(structure.to_string())
}
