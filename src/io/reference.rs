use crate::utils::{open_text_reader, Result};
use bio::io::fasta;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSequence {
    pub id: String,
    pub seq: Vec<u8>,
}

pub fn read_references(path: &Path) -> Result<Vec<ReferenceSequence>> {
    let reader = fasta::Reader::new(open_text_reader(path)?);
    let mut references = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format!("{}: {}", path.display(), e))?;
        record
            .check()
            .map_err(|e| format!("{}: record {}: {}", path.display(), record.id(), e))?;
        references.push(ReferenceSequence {
            id: record.id().to_string(),
            seq: record.seq().to_vec(),
        });
    }
    if references.is_empty() {
        return Err(format!("No sequences found in {}", path.display()));
    }
    Ok(references)
}
