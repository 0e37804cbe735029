use super::alignment::Alignment;
use super::element::StructuralElement;
use super::pairing::ConsensusPairing;
use super::structure::{find_stem_loops, partition, StemLoopSpan};
use crate::fold::{fold_consensus, FoldParams};
use crate::io::AlignmentRecord;
use crate::utils::Result;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct MotifParams {
    /// Longer alignments are skipped.
    pub max_length: usize,
    /// Fold the consensus instead of using `SS_cons`.
    pub fold: Option<FoldParams>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StemLoop {
    pub span: StemLoopSpan,
    /// Innermost element first.
    pub elements: Vec<StructuralElement>,
}

/// Structural profile of one alignment record.
#[derive(Debug, Clone, PartialEq)]
pub struct Motif {
    pub header: BTreeMap<String, String>,
    pub column_info: BTreeMap<String, String>,
    pub alignment: Alignment,
    pub pairing: ConsensusPairing,
    pub stem_loops: Vec<StemLoop>,
}

impl Motif {
    pub fn name(&self) -> &str {
        self.header
            .get("ID")
            .or_else(|| self.header.get("AC"))
            .map_or("unnamed", |s| s.as_str())
    }

    /// Keys under which the family may appear in a reference-position table.
    pub fn family_keys(&self) -> impl Iterator<Item = &str> {
        ["AC", "ID"]
            .into_iter()
            .filter_map(move |key| self.header.get(key).map(|s| s.as_str()))
    }
}

pub fn build_motif(record: AlignmentRecord, params: &MotifParams) -> Result<Motif> {
    let num_columns = record.alignment.num_columns();
    if num_columns > params.max_length {
        return Err(format!(
            "{}: alignment length {} exceeds maximum of {}",
            record.name(),
            num_columns,
            params.max_length
        ));
    }

    let structure = match &params.fold {
        Some(fold_params) => fold_consensus(&record, fold_params)?,
        None => record.consensus_structure()?.to_string(),
    };
    if structure.len() != num_columns {
        return Err(format!(
            "{}: structure length {} does not match {} alignment columns",
            record.name(),
            structure.len(),
            num_columns
        ));
    }
    let pairing = ConsensusPairing::from_dot_bracket(&structure)
        .map_err(|e| format!("{}: {}", record.name(), e))?;

    let stem_loops: Vec<StemLoop> = find_stem_loops(&pairing)
        .into_iter()
        .map(|span| StemLoop {
            span,
            elements: partition(span, &record.alignment, &pairing),
        })
        .collect();
    log::debug!(
        "{}: {} stem-loops, {} elements",
        record.name(),
        stem_loops.len(),
        stem_loops.iter().map(|s| s.elements.len()).sum::<usize>()
    );

    Ok(Motif {
        header: record.header,
        column_info: record.column_info,
        alignment: record.alignment,
        pairing,
        stem_loops,
    })
}

/// Builds one motif per record on a pool of `num_threads` workers. Each
/// record owns its output slot; records that fail are logged and left empty.
pub fn build_motifs(
    records: Vec<AlignmentRecord>,
    params: &MotifParams,
    num_threads: usize,
) -> Result<Vec<Option<Motif>>> {
    log::debug!("Initializing thread pool with {} threads...", num_threads);
    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("rnamotif-{}", i))
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))?;

    let mut motifs: Vec<Option<Motif>> = (0..records.len()).map(|_| None).collect();
    pool.install(|| {
        motifs
            .par_iter_mut()
            .zip(records.into_par_iter())
            .for_each(|(slot, record)| {
                let name = record.name().to_string();
                match build_motif(record, params) {
                    Ok(motif) => *slot = Some(motif),
                    Err(e) => log::warn!("Skipping {}: {}", name, e),
                }
            });
    });

    Ok(motifs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_stockholm;
    use crate::motif::StructureType;

    const RECORDS: &str = "# STOCKHOLM 1.0
#=GF ID hairpin
#=GF AC RF90001
s1 GGCAAAGCC..GGAAACC
s2 GGCAAUGCC..GGAAACC
#=GC SS_cons (((...)))..((...))
//
# STOCKHOLM 1.0
#=GF ID broken
s1 GGCAAAGCC
#=GC SS_cons (((...)).
//
# STOCKHOLM 1.0
#=GF ID long
s1 GGCAAAGCCAAAAAAAAAAAAAAAAAAAAAA
#=GC SS_cons (((...)))......................
//
";

    fn params() -> MotifParams {
        MotifParams {
            max_length: 20,
            fold: None,
        }
    }

    #[test]
    fn motif_from_annotated_structure() {
        let mut records = parse_stockholm(RECORDS.as_bytes()).unwrap();
        let motif = build_motif(records.remove(0), &params()).unwrap();
        assert_eq!(motif.name(), "hairpin");
        assert_eq!(motif.family_keys().collect::<Vec<_>>(), vec!["RF90001", "hairpin"]);
        assert_eq!(motif.stem_loops.len(), 2);
        let kinds: Vec<StructureType> = motif.stem_loops[0].elements.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![StructureType::Hairpin, StructureType::Stem]);
        assert_eq!(motif.stem_loops[1].span, StemLoopSpan { start: 11, end: 17 });
    }

    #[test]
    fn failing_records_leave_empty_slots() {
        let records = parse_stockholm(RECORDS.as_bytes()).unwrap();
        let motifs = build_motifs(records, &params(), 2).unwrap();
        assert_eq!(motifs.len(), 3);
        assert!(motifs[0].is_some());
        assert!(motifs[1].is_none());
        assert!(motifs[2].is_none());
    }

    #[test]
    fn over_length_alignment_is_rejected() {
        let mut records = parse_stockholm(RECORDS.as_bytes()).unwrap();
        let err = build_motif(records.remove(2), &params()).unwrap_err();
        assert_eq!(err, "long: alignment length 31 exceeds maximum of 20");
    }
}
