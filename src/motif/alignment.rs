use super::base::{is_gap, Base};
use crate::utils::Result;

/// A gapped multiple alignment, one row per member sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    pub names: Vec<String>,
    pub rows: Vec<Vec<u8>>,
}

impl Alignment {
    pub fn new(names: Vec<String>, rows: Vec<Vec<u8>>) -> Result<Self> {
        if names.len() != rows.len() {
            return Err(format!(
                "Alignment has {} names but {} rows",
                names.len(),
                rows.len()
            ));
        }
        if let Some(first) = rows.first() {
            if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != first.len()) {
                return Err(format!(
                    "Alignment row {} ({}) has {} columns, expected {}",
                    i,
                    names[i],
                    row.len(),
                    first.len()
                ));
            }
        }
        Ok(Self { names, rows })
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }

    pub fn base_at(&self, row: usize, column: usize) -> Option<Base> {
        self.rows[row].get(column).and_then(|&c| Base::from_ascii(c))
    }

    /// Number of residues of `row` inside the inclusive column range.
    pub fn ungapped_length(&self, row: usize, start: usize, end: usize) -> usize {
        self.rows[row][start..=end]
            .iter()
            .filter(|&&c| !is_gap(c))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> Alignment {
        Alignment::new(
            vec!["s1".into(), "s2".into()],
            vec![b"AC-GU".to_vec(), b"..CGA".to_vec()],
        )
        .unwrap()
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let result = Alignment::new(
            vec!["s1".into(), "s2".into()],
            vec![b"ACGU".to_vec(), b"ACG".to_vec()],
        );
        assert!(result.is_err());
    }

    #[test]
    fn ungapped_length_counts_residues_only() {
        let aln = toy();
        assert_eq!(aln.ungapped_length(0, 0, 4), 4);
        assert_eq!(aln.ungapped_length(1, 0, 1), 0);
        assert_eq!(aln.ungapped_length(1, 1, 3), 2);
    }

    #[test]
    fn base_at_skips_gaps() {
        let aln = toy();
        assert_eq!(aln.base_at(1, 0), None);
        assert_eq!(aln.base_at(0, 4), Some(Base::U));
    }
}
