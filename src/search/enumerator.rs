use crate::motif::PAIR_RADIX;
use arrayvec::ArrayVec;

/// One observed symbol of a profile column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileSymbol {
    pub code: u8,
    pub count: u32,
    pub frequency: f64,
}

/// Yields the observed symbols of one profile column, most frequent first.
///
/// Works for single-base (4 symbols) and base-pair (16 symbols) columns
/// alike. Ties are broken by ascending symbol code. Symbols whose frequency
/// is below `min_frequency` are never yielded, except for the most frequent
/// one, so every column with observations keeps at least one symbol.
#[derive(Debug, Clone)]
pub struct ProfileEnumerator {
    symbols: ArrayVec<ProfileSymbol, PAIR_RADIX>,
    next: usize,
}

impl ProfileEnumerator {
    pub fn new(counts: &[u32], min_frequency: f64) -> Self {
        let total: u32 = counts.iter().take(PAIR_RADIX).sum();
        let mut symbols: ArrayVec<ProfileSymbol, PAIR_RADIX> = counts
            .iter()
            .take(PAIR_RADIX)
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(code, &count)| ProfileSymbol {
                code: code as u8,
                count,
                frequency: count as f64 / total as f64,
            })
            .collect();
        symbols.sort_unstable_by(|a, b| b.count.cmp(&a.count).then(a.code.cmp(&b.code)));

        let keep = 1 + symbols
            .iter()
            .skip(1)
            .take_while(|s| s.frequency >= min_frequency)
            .count();
        symbols.truncate(keep);

        Self { symbols, next: 0 }
    }

    /// Number of symbols this enumerator yields when not cut short.
    pub fn radix(&self) -> usize {
        self.symbols.len()
    }

    pub fn at_end(&self) -> bool {
        self.next >= self.symbols.len()
    }

    pub fn force_end(&mut self) {
        self.next = self.symbols.len();
    }
}

impl Iterator for ProfileEnumerator {
    type Item = ProfileSymbol;

    fn next(&mut self) -> Option<Self::Item> {
        let symbol = self.symbols.get(self.next).copied()?;
        self.next += 1;
        Some(symbol)
    }
}

impl std::iter::FusedIterator for ProfileEnumerator {}
