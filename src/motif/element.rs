use super::alignment::Alignment;
use super::base::PAIR_RADIX;
use super::profile::{mean_entropy, pair_columns, ProfileComponent};
use std::fmt;

/// Hairpins shorter than this are sterically impossible.
pub const MIN_HAIRPIN_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureType {
    Stem,
    Hairpin,
    Loop,
    LeftBulge,
    RightBulge,
    Multiloop,
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StructureType::Stem => "STEM",
            StructureType::Hairpin => "HAIRPIN",
            StructureType::Loop => "LOOP",
            StructureType::LeftBulge => "LEFT_BULGE",
            StructureType::RightBulge => "RIGHT_BULGE",
            StructureType::Multiloop => "MULTILOOP",
        };
        write!(f, "{}", name)
    }
}

/// One structural element of a stem-loop with its profiled components.
///
/// Stems carry the 5' and 3' arms as two components plus the joint pair
/// counts, innermost pair first. Interior loops carry both sides. All other
/// elements carry a single component.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralElement {
    pub kind: StructureType,
    pub components: Vec<ProfileComponent>,
    pub pairs: Vec<[u32; PAIR_RADIX]>,
    /// Searched right to left, i.e. grown at the 5' end.
    pub loop_left: bool,
}

impl StructuralElement {
    fn single(kind: StructureType, component: ProfileComponent, loop_left: bool) -> Self {
        Self {
            kind,
            components: vec![component],
            pairs: Vec::new(),
            loop_left,
        }
    }

    /// Stem over the inclusive arms `left` and `right`, outermost pair
    /// `(left.0, right.1)`.
    pub fn stem(alignment: &Alignment, left: (usize, usize), right: (usize, usize)) -> Self {
        let n = left.1 - left.0 + 1;
        let pairs = (0..n)
            .rev()
            .map(|t| (left.0 + t, right.1 - t))
            .collect::<Vec<_>>();
        Self {
            kind: StructureType::Stem,
            components: vec![
                ProfileComponent::build(alignment, left.0, left.1),
                ProfileComponent::build(alignment, right.0, right.1),
            ],
            pairs: pair_columns(alignment, &pairs),
            loop_left: false,
        }
    }

    pub fn hairpin(alignment: &Alignment, start: usize, end: usize) -> Self {
        let mut component = ProfileComponent::build(alignment, start, end);
        component.stats.min = component.stats.min.max(MIN_HAIRPIN_LENGTH);
        Self::single(StructureType::Hairpin, component, false)
    }

    pub fn multiloop(alignment: &Alignment, start: usize, end: usize) -> Self {
        let component = ProfileComponent::build(alignment, start, end);
        Self::single(StructureType::Multiloop, component, false)
    }

    pub fn left_bulge(alignment: &Alignment, start: usize, end: usize) -> Self {
        let component = ProfileComponent::build(alignment, start, end);
        Self::single(StructureType::LeftBulge, component, true)
    }

    pub fn right_bulge(alignment: &Alignment, start: usize, end: usize) -> Self {
        let component = ProfileComponent::build(alignment, start, end);
        Self::single(StructureType::RightBulge, component, false)
    }

    pub fn interior_loop(alignment: &Alignment, left: (usize, usize), right: (usize, usize)) -> Self {
        Self {
            kind: StructureType::Loop,
            components: vec![
                ProfileComponent::build(alignment, left.0, left.1),
                ProfileComponent::build(alignment, right.0, right.1),
            ],
            pairs: Vec::new(),
            loop_left: true,
        }
    }

    /// Mean column entropy in bits; joint pair entropy for stems.
    pub fn entropy(&self) -> f64 {
        match self.kind {
            StructureType::Stem => mean_entropy(self.pairs.iter().map(|c| c.as_slice())),
            _ => mean_entropy(
                self.components
                    .iter()
                    .flat_map(|c| c.columns.iter().map(|col| col.as_slice())),
            ),
        }
    }

    pub fn column_ranges(&self) -> String {
        self.components
            .iter()
            .map(|c| format!("{}-{}", c.start, c.end))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alignment(rows: &[&str]) -> Alignment {
        Alignment::new(
            (0..rows.len()).map(|i| format!("seq{}", i)).collect(),
            rows.iter().map(|r| r.as_bytes().to_vec()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn stem_pairs_run_innermost_first() {
        let aln = alignment(&["GCAAAGC", "GCAAAGU"]);
        let stem = StructuralElement::stem(&aln, (0, 1), (5, 6));
        assert_eq!(stem.pairs.len(), 2);
        // innermost pair is (1, 5): C-G in both rows
        assert_eq!(stem.pairs[0][6], 2);
        // outermost pair is (0, 6): G-C and G-U
        assert_eq!(stem.pairs[1][9], 1);
        assert_eq!(stem.pairs[1][11], 1);
        assert_eq!(stem.column_ranges(), "0-1,5-6");
    }

    #[test]
    fn short_hairpin_is_floored() {
        let aln = alignment(&["GCAAGC", "GC-AGC"]);
        let hairpin = StructuralElement::hairpin(&aln, 2, 3);
        assert_eq!(hairpin.components[0].stats.min, 3);
        assert_eq!(hairpin.components[0].stats.max, 2);
    }

    #[test]
    fn conserved_stem_has_zero_entropy() {
        let aln = alignment(&["GAAAC", "GAAAC"]);
        let stem = StructuralElement::stem(&aln, (0, 0), (4, 4));
        assert_eq!(stem.entropy(), 0.0);
        assert_eq!(stem.kind.to_string(), "STEM");
    }
}
