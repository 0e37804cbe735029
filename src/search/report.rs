use super::index::Strand;
use crate::io::ReferencePosition;
use crate::motif::hash_sequence;
use std::collections::HashSet;

/// One reference location matched by a candidate of a stem-loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub family: String,
    pub stem_loop: usize,
    pub candidate: String,
    pub probability: f64,
    pub reference: String,
    pub start: usize,
    pub end: usize,
    pub strand: Strand,
}

/// Agreement of the hits of one stem-loop with the known family members.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validation {
    pub hits: usize,
    pub hits_inside: usize,
    pub members: usize,
    pub members_found: usize,
}

impl Validation {
    pub fn hits_outside(&self) -> usize {
        self.hits - self.hits_inside
    }
}

pub fn validate(hits: &[Hit], members: &[ReferencePosition]) -> Validation {
    let overlaps = |hit: &Hit, member: &ReferencePosition| {
        (hit.strand == Strand::Reverse) == member.reverse
            && member.region.overlaps(&hit.reference, hit.start, hit.end)
    };
    Validation {
        hits: hits.len(),
        hits_inside: hits
            .iter()
            .filter(|h| members.iter().any(|m| overlaps(h, m)))
            .count(),
        members: members.len(),
        members_found: members
            .iter()
            .filter(|m| hits.iter().any(|h| overlaps(h, m)))
            .count(),
    }
}

/// Number of different candidate sequences among `hits`.
pub fn distinct_candidates(hits: &[Hit]) -> usize {
    hits.iter()
        .map(|h| (h.candidate.len(), hash_sequence(h.candidate.as_bytes())))
        .collect::<HashSet<_>>()
        .len()
}
