mod backtrack;
mod engine;
mod enumerator;
mod index;
mod report;

pub use backtrack::{search_plan, seed_length, MotifBacktrackIterator, SearchColumn, SearchStep, Side};
pub use engine::MotifSearch;
pub use enumerator::{ProfileEnumerator, ProfileSymbol};
pub use index::{BidirectionalCursor, Direction, FmdCursor, Occurrence, ReferenceIndex, Strand};
pub use report::{distinct_candidates, validate, Hit, Validation};

#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Profile symbols rarer than this fraction are not enumerated.
    pub min_frequency: f64,
    /// Candidates whose profile probability drops below this are pruned.
    pub min_probability: f64,
    /// Stem-loops spelling fewer bases than this are not searched.
    pub min_seed_length: usize,
    pub include_reverse: bool,
}
