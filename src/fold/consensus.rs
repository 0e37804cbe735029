use crate::motif::{Alignment, Base, ConsensusPairing, BASE_RADIX};
use crate::utils::Result;

/// Ungapped consensus of an alignment and the column of each of its bases.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusSequence {
    pub sequence: Vec<u8>,
    pub columns: Vec<usize>,
}

/// Most frequent base of every column that is not mostly gaps. Ties go to
/// the lower base code.
pub fn consensus_sequence(alignment: &Alignment) -> ConsensusSequence {
    let mut sequence = Vec::new();
    let mut columns = Vec::new();
    for column in 0..alignment.num_columns() {
        let mut counts = [0usize; BASE_RADIX];
        for row in 0..alignment.num_rows() {
            if let Some(base) = alignment.base_at(row, column) {
                counts[base.code() as usize] += 1;
            }
        }
        let gaps = alignment.num_rows() - counts.iter().sum::<usize>();
        let (code, &max) = counts
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|&(_, c)| c)
            .unwrap_or((0, &0));
        if max == 0 || max < gaps {
            continue;
        }
        if let Some(base) = Base::from_code(code as u8) {
            sequence.push(base.as_rna());
            columns.push(column);
        }
    }
    ConsensusSequence { sequence, columns }
}

/// Restricts an alignment-wide structure to the consensus columns. Pairs
/// losing a partner become unconstrained.
pub fn project_constraint(structure: &str, columns: &[usize]) -> Result<String> {
    let pairing = ConsensusPairing::from_dot_bracket(structure)?;
    let mut kept = vec![false; pairing.len()];
    for &column in columns {
        if column >= kept.len() {
            return Err(format!(
                "Consensus column {} outside structure of length {}",
                column,
                pairing.len()
            ));
        }
        kept[column] = true;
    }
    Ok(columns
        .iter()
        .map(|&column| match pairing.partner(column) {
            Some(p) if kept[p] && p > column => '(',
            Some(p) if kept[p] => ')',
            _ => '.',
        })
        .collect())
}

/// Places a structure predicted on the consensus back onto alignment
/// columns. Only `()` pairs are kept; other bracket layers are pseudoknots.
pub fn lift_structure(structure: &str, columns: &[usize], num_columns: usize) -> Result<String> {
    if structure.len() != columns.len() {
        return Err(format!(
            "Predicted structure has length {}, consensus has {}",
            structure.len(),
            columns.len()
        ));
    }
    let nested: Vec<u8> = structure
        .bytes()
        .map(|c| if c == b'(' || c == b')' { c } else { b'.' })
        .collect();
    ConsensusPairing::from_dot_bracket(&String::from_utf8_lossy(&nested))?;

    let mut lifted = vec![b'.'; num_columns];
    for (&c, &column) in nested.iter().zip(columns) {
        if column >= num_columns {
            return Err(format!("Consensus column {} outside alignment", column));
        }
        lifted[column] = c;
    }
    Ok(String::from_utf8_lossy(&lifted).into_owned())
}
