use crate::utils::Result;

/// Half-open interval `[start, end)` on a named reference sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct GenomicRegion {
    pub contig: String,
    pub start: usize,
    pub end: usize,
}

impl GenomicRegion {
    pub fn new(contig: impl Into<String>, start: usize, end: usize) -> Result<Self> {
        if start >= end {
            return Err(format!("Invalid region: start {} >= end {}", start, end));
        }

        Ok(Self {
            contig: contig.into(),
            start,
            end,
        })
    }

    pub fn overlaps(&self, contig: &str, start: usize, end: usize) -> bool {
        self.contig == contig && start < self.end && self.start < end
    }
}
