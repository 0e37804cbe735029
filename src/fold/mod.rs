mod consensus;
mod ipknot;
mod rnafold;

pub use consensus::{consensus_sequence, lift_structure, project_constraint, ConsensusSequence};
pub use ipknot::IpKnot;
pub use rnafold::RnaFold;

use crate::io::AlignmentRecord;
use crate::utils::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldParams {
    /// Predict with a pseudoknot-capable folder.
    pub pseudoknot: bool,
    /// Constrain the prediction with the annotated consensus structure.
    pub constrain: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictedStructure {
    pub dot_bracket: String,
    /// Free energy for RNAfold, zero when the folder reports none.
    pub score: f64,
}

/// Secondary-structure prediction of a single ungapped sequence.
pub trait StructurePredictor {
    fn name(&self) -> &str;

    /// Candidate structures, best first. `constraint` has the length of
    /// `sequence` when given.
    fn predict(&self, sequence: &[u8], constraint: Option<&str>) -> Result<Vec<PredictedStructure>>;
}

pub fn predictor(params: &FoldParams) -> Box<dyn StructurePredictor> {
    if params.pseudoknot {
        Box::new(IpKnot::new())
    } else {
        Box::new(RnaFold::new())
    }
}

/// Folds the majority consensus of `record` and returns a dot-bracket string
/// over all alignment columns.
pub fn fold_consensus(record: &AlignmentRecord, params: &FoldParams) -> Result<String> {
    let consensus = consensus_sequence(&record.alignment);
    if consensus.sequence.is_empty() {
        return Err(format!("{}: consensus sequence is empty", record.name()));
    }

    let constraint = if params.constrain {
        Some(project_constraint(
            record.consensus_structure()?,
            &consensus.columns,
        )?)
    } else {
        None
    };

    let predictor = predictor(params);
    log::debug!(
        "Folding {} ({} nt) with {}",
        record.name(),
        consensus.sequence.len(),
        predictor.name()
    );
    let best = predictor
        .predict(&consensus.sequence, constraint.as_deref())?
        .into_iter()
        .next()
        .ok_or_else(|| format!("{}: {} returned no structure", record.name(), predictor.name()))?;

    lift_structure(
        &best.dot_bracket,
        &consensus.columns,
        record.alignment.num_columns(),
    )
}

/// Predictor executable, overridable through `env_var`.
fn executable(env_var: &str, default: &str) -> String {
    std::env::var(env_var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
