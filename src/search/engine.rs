use super::backtrack::{MotifBacktrackIterator, SearchStep};
use super::index::{BidirectionalCursor, Direction, Occurrence};
use super::SearchParams;
use crate::motif::{Base, StructuralElement};
use arrayvec::ArrayVec;

/// Extensions applied to the cursor for one step of the walk.
#[derive(Debug, Clone)]
struct Frame {
    extensions: ArrayVec<Direction, 2>,
    probability: f64,
    left: Option<Base>,
    right: Option<Base>,
}

/// Drives a [`MotifBacktrackIterator`] against a bidirectional cursor.
///
/// The cursor always spells the iterator's current path. A step that cannot
/// be matched is retracted completely and its subtree pruned, so the walk
/// only visits prefixes present in the index.
pub struct MotifSearch<'a, C: BidirectionalCursor> {
    iter: MotifBacktrackIterator<'a>,
    cursor: C,
    frames: Vec<Frame>,
    min_probability: f64,
    finished: bool,
}

impl<'a, C: BidirectionalCursor> MotifSearch<'a, C> {
    pub fn new(elements: &'a [StructuralElement], cursor: C, params: &SearchParams) -> Self {
        Self::from_iter(
            MotifBacktrackIterator::new(elements, params.min_frequency),
            cursor,
            params.min_probability,
        )
    }

    pub fn from_iter(iter: MotifBacktrackIterator<'a>, cursor: C, min_probability: f64) -> Self {
        Self {
            iter,
            cursor,
            frames: Vec::new(),
            min_probability,
            finished: false,
        }
    }

    /// Advances to the next fully matched candidate. Returns false once the
    /// search space is exhausted, and on every call after that.
    pub fn next(&mut self) -> bool {
        if self.finished {
            return false;
        }

        while let Some(step) = self.iter.next() {
            self.unwind(step.depth);

            let probability = self.frames.last().map_or(1.0, |f| f.probability) * step.frequency;
            if probability < self.min_probability {
                self.iter.prune_current();
                continue;
            }

            match self.apply(&step) {
                Some(extensions) => self.frames.push(Frame {
                    extensions,
                    probability,
                    left: step.left,
                    right: step.right,
                }),
                None => {
                    self.iter.prune_current();
                    continue;
                }
            }

            if step.complete {
                return true;
            }
        }

        log::trace!(
            "Search exhausted after {} of {} combinations",
            self.iter.combinations(),
            self.iter.total_combinations()
        );
        self.finished = true;
        false
    }

    /// Extends the cursor with both bases of `step`, or with neither.
    fn apply(&mut self, step: &SearchStep) -> Option<ArrayVec<Direction, 2>> {
        let mut extensions = ArrayVec::new();
        if let Some(base) = step.right {
            if !self.cursor.extend_forward(base) {
                return None;
            }
            extensions.push(Direction::Forward);
        }
        if let Some(base) = step.left {
            if !self.cursor.extend_backward(base) {
                for direction in extensions.iter().rev() {
                    self.cursor.retract(*direction);
                }
                return None;
            }
            extensions.push(Direction::Backward);
        }
        Some(extensions)
    }

    fn unwind(&mut self, depth: usize) {
        while self.frames.len() > depth {
            if let Some(frame) = self.frames.pop() {
                for direction in frame.extensions.iter().rev() {
                    self.cursor.retract(*direction);
                }
            }
        }
    }

    /// Matched sequence, 5' to 3'.
    pub fn candidate(&self) -> Vec<u8> {
        let lefts = self.frames.iter().rev().filter_map(|f| f.left);
        let rights = self.frames.iter().filter_map(|f| f.right);
        lefts.chain(rights).map(|b| b.as_rna()).collect()
    }

    /// Product of the profile frequencies of the matched symbols.
    pub fn probability(&self) -> f64 {
        self.frames.last().map_or(0.0, |f| f.probability)
    }

    pub fn occurrences(&self) -> Vec<Occurrence> {
        self.cursor.occurrences()
    }

    pub fn occurrence_count(&self) -> usize {
        self.cursor.occurrence_count()
    }

    pub fn combinations(&self) -> u64 {
        self.iter.combinations()
    }

    pub fn cursor(&self) -> &C {
        &self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ReferenceSequence;
    use crate::motif::Alignment;
    use crate::search::index::{ReferenceIndex, Strand};
    use std::collections::VecDeque;

    /// Scans a single text for the current pattern.
    struct ScanCursor {
        text: Vec<u8>,
        pattern: VecDeque<u8>,
        attempts: usize,
    }

    impl ScanCursor {
        fn new(text: &str) -> Self {
            Self {
                text: text.as_bytes().to_vec(),
                pattern: VecDeque::new(),
                attempts: 0,
            }
        }

        fn positions(&self) -> Vec<usize> {
            let pattern: Vec<u8> = self.pattern.iter().copied().collect();
            if pattern.is_empty() || pattern.len() > self.text.len() {
                return Vec::new();
            }
            self.text
                .windows(pattern.len())
                .enumerate()
                .filter(|(_, w)| *w == pattern.as_slice())
                .map(|(i, _)| i)
                .collect()
        }

        fn try_extend(&mut self, base: Base, direction: Direction) -> bool {
            self.attempts += 1;
            match direction {
                Direction::Forward => self.pattern.push_back(base.as_rna()),
                Direction::Backward => self.pattern.push_front(base.as_rna()),
            }
            if self.positions().is_empty() {
                self.retract(direction);
                return false;
            }
            true
        }
    }

    impl BidirectionalCursor for ScanCursor {
        fn extend_forward(&mut self, base: Base) -> bool {
            self.try_extend(base, Direction::Forward)
        }

        fn extend_backward(&mut self, base: Base) -> bool {
            self.try_extend(base, Direction::Backward)
        }

        fn retract(&mut self, direction: Direction) {
            match direction {
                Direction::Forward => self.pattern.pop_back(),
                Direction::Backward => self.pattern.pop_front(),
            };
        }

        fn depth(&self) -> usize {
            self.pattern.len()
        }

        fn occurrence_count(&self) -> usize {
            self.positions().len()
        }

        fn occurrences(&self) -> Vec<Occurrence> {
            self.positions()
                .into_iter()
                .map(|offset| Occurrence {
                    sequence: 0,
                    offset,
                    strand: Strand::Forward,
                })
                .collect()
        }
    }

    fn alignment(rows: &[&str]) -> Alignment {
        Alignment::new(
            (0..rows.len()).map(|i| format!("seq{}", i)).collect(),
            rows.iter().map(|r| r.as_bytes().to_vec()).collect(),
        )
        .unwrap()
    }

    fn params() -> SearchParams {
        SearchParams::default()
    }

    #[test]
    fn finds_stem_loop_candidates() {
        let aln = alignment(&["GCAAAGC", "GCAUAGC"]);
        let elements = vec![
            StructuralElement::hairpin(&aln, 2, 4),
            StructuralElement::stem(&aln, (0, 1), (5, 6)),
        ];
        let text = "UUUGCAUAGCUUU";
        let mut search = MotifSearch::new(&elements, ScanCursor::new(text), &params());

        assert!(search.next());
        assert_eq!(search.candidate(), b"GCAUAGC".to_vec());
        assert_eq!(search.occurrence_count(), 1);
        assert_eq!(search.occurrences()[0].offset, 3);
        assert!((search.probability() - 0.5).abs() < 1e-12);

        assert!(!search.next());
        assert!(!search.next());
    }

    #[test]
    fn half_matched_stem_is_retracted() {
        let aln = alignment(&["CAG"]);
        let elements = vec![
            StructuralElement::hairpin(&aln, 1, 1),
            StructuralElement::stem(&aln, (0, 0), (2, 2)),
        ];
        // AG matches the 3' half of the pair, CAG never occurs
        let text = "AGUAGUA";
        let mut search = MotifSearch::new(&elements, ScanCursor::new(text), &params());
        let before = text.matches('A').count();

        assert!(!search.next());
        assert_eq!(search.cursor().depth(), 1);
        assert_eq!(search.occurrence_count(), before);
    }

    #[test]
    fn failed_prefix_prunes_its_subtree() {
        let aln = alignment(&["AG", "AU", "CG"]);
        let elements = vec![StructuralElement::hairpin(&aln, 0, 1)];
        let mut search = MotifSearch::new(&elements, ScanCursor::new("UCGU"), &params());

        assert!(search.next());
        assert_eq!(search.candidate(), b"CG".to_vec());
        assert!(!search.next());
        // A fails, then C, G, U; no second-column symbol is tried after A
        assert_eq!(search.cursor().attempts, 4);
    }

    #[test]
    fn low_probability_candidates_are_skipped() {
        let aln = alignment(&["AC", "AC", "AC", "GU"]);
        let elements = vec![StructuralElement::hairpin(&aln, 0, 1)];
        let search_params = SearchParams {
            min_probability: 0.5,
            ..SearchParams::default()
        };
        let mut search = MotifSearch::new(&elements, ScanCursor::new("ACGUAU"), &search_params);

        let mut found = Vec::new();
        while search.next() {
            found.push(String::from_utf8(search.candidate()).unwrap());
        }
        assert_eq!(found, vec!["AC"]);
    }

    #[test]
    fn searches_the_reference_index() {
        let refs = vec![
            ReferenceSequence {
                id: "chunk1".into(),
                seq: b"TTTTGGCAAAGCCTTTT".to_vec(),
            },
            ReferenceSequence {
                id: "chunk2".into(),
                seq: b"ACACACACAC".to_vec(),
            },
        ];
        let index = ReferenceIndex::new(&refs).unwrap();
        let aln = alignment(&["GGCAAAGCC", "GGCAAUGCC"]);
        let elements = vec![
            StructuralElement::hairpin(&aln, 3, 5),
            StructuralElement::stem(&aln, (0, 2), (6, 8)),
        ];
        let mut search = MotifSearch::new(&elements, index.cursor(), &params());

        let mut hits = Vec::new();
        while search.next() {
            hits.push((search.candidate(), search.occurrences()));
        }
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, b"GGCAAAGCC".to_vec());
        let forward: Vec<&Occurrence> = hits[0]
            .1
            .iter()
            .filter(|o| o.strand == Strand::Forward)
            .collect();
        assert_eq!(forward.len(), 1);
        assert_eq!((forward[0].sequence, forward[0].offset), (0, 4));
    }
}
