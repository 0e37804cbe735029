use super::enumerator::ProfileEnumerator;
use crate::motif::{split_pair_code, Base, StructuralElement, StructureType};

/// Which end of the candidate a column grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Prepended, 5' end.
    Left,
    /// Appended, 3' end.
    Right,
    /// Base pair, one base on each end.
    Both,
}

#[derive(Debug, Clone)]
pub struct SearchColumn<'a> {
    pub element: usize,
    pub side: Side,
    pub counts: &'a [u32],
}

/// Flattens elements into the column order of the search, innermost first.
/// All-gap columns carry no symbol and are left out.
pub fn search_plan(elements: &[StructuralElement]) -> Vec<SearchColumn<'_>> {
    let mut plan = Vec::new();
    for (index, element) in elements.iter().enumerate() {
        match element.kind {
            StructureType::Stem => {
                for pair in &element.pairs {
                    push_column(&mut plan, index, Side::Both, pair);
                }
            }
            StructureType::Loop => {
                if let [left, right] = element.components.as_slice() {
                    for column in left.columns.iter().rev() {
                        push_column(&mut plan, index, Side::Left, column);
                    }
                    for column in &right.columns {
                        push_column(&mut plan, index, Side::Right, column);
                    }
                }
            }
            _ => {
                for component in &element.components {
                    if element.loop_left {
                        for column in component.columns.iter().rev() {
                            push_column(&mut plan, index, Side::Left, column);
                        }
                    } else {
                        for column in &component.columns {
                            push_column(&mut plan, index, Side::Right, column);
                        }
                    }
                }
            }
        }
    }
    plan
}

fn push_column<'a>(plan: &mut Vec<SearchColumn<'a>>, element: usize, side: Side, counts: &'a [u32]) {
    if counts.iter().any(|&c| c > 0) {
        plan.push(SearchColumn {
            element,
            side,
            counts,
        });
    }
}

/// Bases contributed to a candidate by a full pass over the plan.
pub fn seed_length(plan: &[SearchColumn]) -> usize {
    plan.iter()
        .map(|c| if c.side == Side::Both { 2 } else { 1 })
        .sum()
}

/// One symbol choice of the backtracking walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchStep {
    /// Flat column index, equal to the number of suspended enumerators.
    pub depth: usize,
    pub left: Option<Base>,
    pub right: Option<Base>,
    pub frequency: f64,
    /// Last column of the plan: this step completes a candidate.
    pub complete: bool,
}

/// Walks the search plan as a mixed-radix counter. Each column is one digit
/// whose values come from a [`ProfileEnumerator`]; the walk is depth first,
/// so a step at depth `d` always extends the path of the last step at
/// depth `d - 1`.
pub struct MotifBacktrackIterator<'a> {
    columns: Vec<SearchColumn<'a>>,
    min_frequency: f64,
    stack: Vec<ProfileEnumerator>,
    active: Option<ProfileEnumerator>,
    descended: bool,
    combinations: u64,
}

impl<'a> MotifBacktrackIterator<'a> {
    pub fn new(elements: &'a [StructuralElement], min_frequency: f64) -> Self {
        Self::from_plan(search_plan(elements), min_frequency)
    }

    pub fn from_plan(columns: Vec<SearchColumn<'a>>, min_frequency: f64) -> Self {
        let active = columns
            .first()
            .map(|c| ProfileEnumerator::new(c.counts, min_frequency));
        Self {
            columns,
            min_frequency,
            stack: Vec::new(),
            active,
            descended: false,
            combinations: 0,
        }
    }

    pub fn columns(&self) -> &[SearchColumn<'a>] {
        &self.columns
    }

    /// Number of complete candidates generated so far.
    pub fn combinations(&self) -> u64 {
        self.combinations
    }

    /// Size of the unpruned search space.
    pub fn total_combinations(&self) -> u64 {
        self.columns.iter().fold(1u64, |acc, c| {
            acc.saturating_mul(ProfileEnumerator::new(c.counts, self.min_frequency).radix() as u64)
        })
    }

    /// Skips every extension of the symbol returned last. No effect after a
    /// step that completed a candidate.
    pub fn prune_current(&mut self) {
        if self.descended {
            if let Some(active) = self.active.as_mut() {
                active.force_end();
            }
            self.descended = false;
        }
    }
}

impl Iterator for MotifBacktrackIterator<'_> {
    type Item = SearchStep;

    fn next(&mut self) -> Option<Self::Item> {
        let symbol = loop {
            let active = self.active.as_mut()?;
            match active.next() {
                Some(symbol) => break symbol,
                None => match self.stack.pop() {
                    Some(previous) => self.active = Some(previous),
                    None => {
                        self.active = None;
                        return None;
                    }
                },
            }
        };

        let depth = self.stack.len();
        let (left, right) = match self.columns[depth].side {
            Side::Both => split_pair_code(symbol.code)
                .map_or((None, None), |(l, r)| (Some(l), Some(r))),
            Side::Left => (Base::from_code(symbol.code), None),
            Side::Right => (None, Base::from_code(symbol.code)),
        };

        let complete = depth + 1 == self.columns.len();
        if complete {
            self.combinations += 1;
            self.descended = false;
        } else {
            let next = ProfileEnumerator::new(self.columns[depth + 1].counts, self.min_frequency);
            if let Some(current) = self.active.replace(next) {
                self.stack.push(current);
            }
            self.descended = true;
        }
        log::trace!("Step depth={} left={:?} right={:?}", depth, left, right);

        Some(SearchStep {
            depth,
            left,
            right,
            frequency: symbol.frequency,
            complete,
        })
    }
}

impl std::iter::FusedIterator for MotifBacktrackIterator<'_> {}
