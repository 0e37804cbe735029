use super::alignment::Alignment;
use super::base::{pair_code, BASE_RADIX, PAIR_RADIX};
use crate::utils::calculate_stats;
use itertools::Itertools;

/// Ungapped length statistics of one component across alignment rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthStats {
    pub min: usize,
    pub mean: f64,
    pub max: usize,
}

/// Per-column base counts over an inclusive alignment column range.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileComponent {
    pub start: usize,
    pub end: usize,
    pub columns: Vec<[u32; BASE_RADIX]>,
    pub stats: LengthStats,
}

impl ProfileComponent {
    pub fn build(alignment: &Alignment, start: usize, end: usize) -> Self {
        let mut columns = vec![[0u32; BASE_RADIX]; end - start + 1];
        for row in 0..alignment.num_rows() {
            for (offset, counts) in columns.iter_mut().enumerate() {
                if let Some(base) = alignment.base_at(row, start + offset) {
                    counts[base.code() as usize] += 1;
                }
            }
        }

        let lengths = (0..alignment.num_rows())
            .map(|row| alignment.ungapped_length(row, start, end))
            .collect_vec();
        let summary = calculate_stats(&lengths);
        let stats = LengthStats {
            min: summary.min,
            mean: summary.mean,
            max: summary.max,
        };

        Self {
            start,
            end,
            columns,
            stats,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn mean_entropy(&self) -> f64 {
        mean_entropy(self.columns.iter().map(|c| c.as_slice()))
    }
}

/// Joint base-pair counts for `(5' column, 3' column)` pairs. A row
/// contributes only when it carries a base on both sides.
pub fn pair_columns(alignment: &Alignment, pairs: &[(usize, usize)]) -> Vec<[u32; PAIR_RADIX]> {
    pairs
        .iter()
        .map(|&(five_prime, three_prime)| {
            let mut counts = [0u32; PAIR_RADIX];
            for row in 0..alignment.num_rows() {
                if let (Some(l), Some(r)) = (
                    alignment.base_at(row, five_prime),
                    alignment.base_at(row, three_prime),
                ) {
                    counts[pair_code(l, r) as usize] += 1;
                }
            }
            counts
        })
        .collect()
}

/// Shannon entropy in bits; empty columns have zero entropy.
pub fn column_entropy(counts: &[u32]) -> f64 {
    let total: u32 = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

pub fn mean_entropy<'a>(columns: impl Iterator<Item = &'a [u32]>) -> f64 {
    let (sum, n) = columns.fold((0.0, 0usize), |(sum, n), c| (sum + column_entropy(c), n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motif::base::Base;

    fn alignment(rows: &[&str]) -> Alignment {
        Alignment::new(
            (0..rows.len()).map(|i| format!("seq{}", i)).collect(),
            rows.iter().map(|r| r.as_bytes().to_vec()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn identical_rows_give_single_symbol_columns() {
        let aln = alignment(&["GACU", "GACU", "GACU"]);
        let profile = ProfileComponent::build(&aln, 0, 3);
        assert_eq!(profile.columns[0], [0, 0, 3, 0]);
        assert_eq!(profile.columns[3], [0, 0, 0, 3]);
        assert_eq!(profile.stats.min, 4);
        assert_eq!(profile.stats.max, 4);
        assert_eq!(profile.mean_entropy(), 0.0);
    }

    #[test]
    fn gaps_are_excluded_from_counts_and_lengths() {
        let aln = alignment(&["AC-G", "----", "ACUG"]);
        let profile = ProfileComponent::build(&aln, 1, 3);
        assert_eq!(profile.columns[0], [0, 2, 0, 0]);
        assert_eq!(profile.columns[1], [0, 0, 0, 1]);
        assert_eq!(profile.stats.min, 0);
        assert_eq!(profile.stats.max, 3);
        assert!((profile.stats.mean - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn pair_columns_require_both_bases() {
        let aln = alignment(&["GAAC", "G--U", "-AAC"]);
        let pairs = pair_columns(&aln, &[(0, 3)]);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0][pair_code(Base::G, Base::C) as usize], 1);
        assert_eq!(pairs[0][pair_code(Base::G, Base::U) as usize], 1);
        assert_eq!(pairs[0].iter().sum::<u32>(), 2);
    }

    #[test]
    fn entropy_of_uniform_column_is_two_bits() {
        assert!((column_entropy(&[5, 5, 5, 5]) - 2.0).abs() < 1e-12);
        assert_eq!(column_entropy(&[0, 0, 0, 0]), 0.0);
    }
}
