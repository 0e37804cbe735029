use crate::io::ReferenceSequence;
use crate::motif::Base;
use crate::utils::Result;
use bio::alphabets::dna;
use bio::data_structures::bwt::{bwt, less, Less, Occ, BWT};
use bio::data_structures::fmindex::{BiInterval, FMDIndex, FMIndex};
use bio::data_structures::suffix_array::{suffix_array, RawSuffixArray};

const OCC_SAMPLING_RATE: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Appends to the 3' end.
    Forward,
    /// Prepends to the 5' end.
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    Forward,
    Reverse,
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

/// Match location: reference index and 0-based forward-strand offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Occurrence {
    pub sequence: usize,
    pub offset: usize,
    pub strand: Strand,
}

/// A pattern over an index that grows one base at a time at either end.
pub trait BidirectionalCursor {
    /// Appends `base`; returns false and leaves the cursor unchanged when the
    /// longer pattern does not occur.
    fn extend_forward(&mut self, base: Base) -> bool;
    /// Prepends `base`, with the same contract as `extend_forward`.
    fn extend_backward(&mut self, base: Base) -> bool;
    /// Undoes the most recent successful extension, which went in `direction`.
    fn retract(&mut self, direction: Direction);
    /// Current pattern length.
    fn depth(&self) -> usize;
    fn occurrence_count(&self) -> usize;
    fn occurrences(&self) -> Vec<Occurrence>;
}

#[derive(Debug, Clone, Copy)]
struct TextRange {
    start: usize,
    sequence: usize,
    strand: Strand,
}

/// FMD-index over every reference and its reverse complement.
pub struct ReferenceIndex {
    ids: Vec<String>,
    lengths: Vec<usize>,
    ranges: Vec<TextRange>,
    sa: RawSuffixArray,
    fmd: FMDIndex<BWT, Less, Occ>,
}

impl ReferenceIndex {
    pub fn new(references: &[ReferenceSequence]) -> Result<Self> {
        if references.is_empty() {
            return Err("Cannot index an empty reference collection".to_string());
        }

        let total: usize = references.iter().map(|r| 2 * (r.seq.len() + 1)).sum();
        let mut text = Vec::with_capacity(total);
        let mut ranges = Vec::with_capacity(2 * references.len());
        for (sequence, reference) in references.iter().enumerate() {
            let forward: Vec<u8> = reference.seq.iter().map(|&c| normalize(c)).collect();
            ranges.push(TextRange {
                start: text.len(),
                sequence,
                strand: Strand::Forward,
            });
            text.extend_from_slice(&forward);
            text.push(b'$');
            ranges.push(TextRange {
                start: text.len(),
                sequence,
                strand: Strand::Reverse,
            });
            text.extend(dna::revcomp(&forward));
            text.push(b'$');
        }

        log::debug!("Building FMD-index over {} bases", text.len());
        let alphabet = dna::n_alphabet();
        let sa = suffix_array(&text);
        let bwt = bwt(&text, &sa);
        let less = less(&bwt, &alphabet);
        let occ = Occ::new(&bwt, OCC_SAMPLING_RATE, &alphabet);
        let fmd = FMDIndex::from(FMIndex::new(bwt, less, occ));

        Ok(Self {
            ids: references.iter().map(|r| r.id.clone()).collect(),
            lengths: references.iter().map(|r| r.seq.len()).collect(),
            ranges,
            sa,
            fmd,
        })
    }

    pub fn cursor(&self) -> FmdCursor<'_> {
        FmdCursor {
            index: self,
            intervals: Vec::new(),
            directions: Vec::new(),
        }
    }

    pub fn sequence_id(&self, sequence: usize) -> &str {
        &self.ids[sequence]
    }

    fn locate(&self, text_pos: usize, pattern_len: usize) -> Occurrence {
        let slot = self.ranges.partition_point(|r| r.start <= text_pos) - 1;
        let range = self.ranges[slot];
        let within = text_pos - range.start;
        let offset = match range.strand {
            Strand::Forward => within,
            Strand::Reverse => self.lengths[range.sequence].saturating_sub(within + pattern_len),
        };
        Occurrence {
            sequence: range.sequence,
            offset,
            strand: range.strand,
        }
    }
}

fn normalize(c: u8) -> u8 {
    match c.to_ascii_uppercase() {
        b'U' => b'T',
        c @ (b'A' | b'C' | b'G' | b'T') => c,
        _ => b'N',
    }
}

fn interval_size(interval: &BiInterval) -> usize {
    let forward = interval.forward();
    forward.upper - forward.lower
}

/// Cursor over a [`ReferenceIndex`] keeping the interval of every prefix of
/// its extension history, so retraction is a pop.
pub struct FmdCursor<'a> {
    index: &'a ReferenceIndex,
    intervals: Vec<BiInterval>,
    directions: Vec<Direction>,
}

impl FmdCursor<'_> {
    fn extend(&mut self, base: Base, direction: Direction) -> bool {
        let symbol = base.as_dna();
        let interval = match (self.intervals.last(), direction) {
            (None, _) => self.index.fmd.init_interval_with(symbol),
            (Some(iv), Direction::Forward) => self.index.fmd.forward_ext(iv, symbol),
            (Some(iv), Direction::Backward) => self.index.fmd.backward_ext(iv, symbol),
        };
        if interval_size(&interval) == 0 {
            return false;
        }
        self.intervals.push(interval);
        self.directions.push(direction);
        true
    }
}

impl BidirectionalCursor for FmdCursor<'_> {
    fn extend_forward(&mut self, base: Base) -> bool {
        self.extend(base, Direction::Forward)
    }

    fn extend_backward(&mut self, base: Base) -> bool {
        self.extend(base, Direction::Backward)
    }

    fn retract(&mut self, direction: Direction) {
        let last = self.directions.pop();
        debug_assert!(
            last == Some(direction) || self.intervals.len() == 1,
            "retracting {:?} after {:?}",
            direction,
            last
        );
        self.intervals.pop();
    }

    fn depth(&self) -> usize {
        self.intervals.len()
    }

    fn occurrence_count(&self) -> usize {
        self.intervals.last().map_or(0, interval_size)
    }

    fn occurrences(&self) -> Vec<Occurrence> {
        let Some(interval) = self.intervals.last() else {
            return Vec::new();
        };
        let pattern_len = self.intervals.len();
        let mut hits: Vec<Occurrence> = interval
            .forward()
            .occ(&self.index.sa)
            .into_iter()
            .map(|pos| self.index.locate(pos, pattern_len))
            .collect();
        hits.sort_unstable();
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(seqs: &[&str]) -> ReferenceIndex {
        let refs: Vec<ReferenceSequence> = seqs
            .iter()
            .enumerate()
            .map(|(i, s)| ReferenceSequence {
                id: format!("chunk{}", i + 1),
                seq: s.as_bytes().to_vec(),
            })
            .collect();
        ReferenceIndex::new(&refs).unwrap()
    }

    fn extend_all(cursor: &mut FmdCursor, pattern: &str) -> bool {
        pattern
            .bytes()
            .all(|c| cursor.extend_forward(Base::from_ascii(c).unwrap()))
    }

    #[test]
    fn forward_extension_finds_both_strands() {
        let idx = index(&["GGACGTTT"]);
        let mut cursor = idx.cursor();
        assert!(extend_all(&mut cursor, "ACG"));
        // ACG occurs on the forward strand at 2; CGT reverse-complements to ACG
        assert_eq!(
            cursor.occurrences(),
            vec![
                Occurrence {
                    sequence: 0,
                    offset: 2,
                    strand: Strand::Forward
                },
                Occurrence {
                    sequence: 0,
                    offset: 3,
                    strand: Strand::Reverse
                },
            ]
        );
        assert_eq!(cursor.occurrence_count(), 2);
    }

    #[test]
    fn rna_input_is_indexed_as_dna() {
        let idx = index(&["CCAUGCC", "UUUU"]);
        let mut cursor = idx.cursor();
        assert!(extend_all(&mut cursor, "AUG"));
        let forward: Vec<Occurrence> = cursor
            .occurrences()
            .into_iter()
            .filter(|o| o.strand == Strand::Forward)
            .collect();
        assert_eq!(forward.len(), 1);
        assert_eq!((forward[0].sequence, forward[0].offset), (0, 2));
        assert_eq!(idx.sequence_id(1), "chunk2");
    }

    #[test]
    fn backward_extension_prepends() {
        let idx = index(&["AAAACGCGTTTT", "CCCC"]);
        let mut cursor = idx.cursor();
        assert!(cursor.extend_forward(Base::C));
        assert!(cursor.extend_forward(Base::G));
        assert!(cursor.extend_backward(Base::A));
        assert_eq!(cursor.depth(), 3);
        let forward: Vec<usize> = cursor
            .occurrences()
            .into_iter()
            .filter(|o| o.strand == Strand::Forward)
            .map(|o| o.offset)
            .collect();
        assert_eq!(forward, vec![3]);
    }

    #[test]
    fn failed_extension_leaves_cursor_unchanged() {
        let idx = index(&["ACACAC"]);
        let mut cursor = idx.cursor();
        assert!(cursor.extend_forward(Base::A));
        let before = cursor.occurrence_count();
        assert!(!cursor.extend_forward(Base::A));
        assert_eq!(cursor.occurrence_count(), before);
        assert_eq!(cursor.depth(), 1);
    }

    #[test]
    fn retract_restores_previous_interval() {
        let idx = index(&["ACGTACGA"]);
        let mut cursor = idx.cursor();
        assert!(cursor.extend_forward(Base::A));
        let single = cursor.occurrence_count();
        assert!(cursor.extend_forward(Base::C));
        assert!(cursor.occurrence_count() < single);
        cursor.retract(Direction::Forward);
        assert_eq!(cursor.occurrence_count(), single);
        cursor.retract(Direction::Forward);
        assert_eq!(cursor.depth(), 0);
        assert_eq!(cursor.occurrence_count(), 0);
    }

    #[test]
    fn empty_collection_is_an_error() {
        assert!(ReferenceIndex::new(&[]).is_err());
    }
}
