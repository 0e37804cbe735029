use crate::utils::Result;

const BRACKETS: [(u8, u8); 4] = [(b'(', b')'), (b'<', b'>'), (b'[', b']'), (b'{', b'}')];

/// Partner table of a consensus secondary structure. Pairs are symmetric and
/// nested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusPairing {
    partners: Vec<Option<usize>>,
}

impl ConsensusPairing {
    pub fn from_dot_bracket(structure: &str) -> Result<Self> {
        let mut stacks: [Vec<usize>; BRACKETS.len()] = Default::default();
        let mut partners = vec![None; structure.len()];

        for (pos, c) in structure.bytes().enumerate() {
            if let Some(family) = BRACKETS.iter().position(|&(open, _)| open == c) {
                stacks[family].push(pos);
            } else if let Some(family) = BRACKETS.iter().position(|&(_, close)| close == c) {
                let open = stacks[family].pop().ok_or_else(|| {
                    format!("Unmatched closing bracket '{}' at position {}", c as char, pos)
                })?;
                partners[open] = Some(pos);
                partners[pos] = Some(open);
            }
        }

        for (family, stack) in stacks.iter().enumerate() {
            if let Some(&pos) = stack.last() {
                return Err(format!(
                    "Unmatched opening bracket '{}' at position {}",
                    BRACKETS[family].0 as char, pos
                ));
            }
        }

        Self::from_partners(partners)
    }

    pub fn from_partners(partners: Vec<Option<usize>>) -> Result<Self> {
        let mut open = Vec::new();
        for (pos, partner) in partners.iter().enumerate() {
            let Some(partner) = *partner else { continue };
            if partner >= partners.len() || partners[partner] != Some(pos) || partner == pos {
                return Err(format!("Asymmetric pair {} -> {}", pos, partner));
            }
            if partner > pos {
                open.push(pos);
            } else if open.pop() != Some(partner) {
                return Err(format!("Crossing pair ({}, {})", partner, pos));
            }
        }
        Ok(Self { partners })
    }

    pub fn len(&self) -> usize {
        self.partners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    pub fn partner(&self, pos: usize) -> Option<usize> {
        self.partners.get(pos).copied().flatten()
    }

    pub fn is_paired(&self, pos: usize) -> bool {
        self.partner(pos).is_some()
    }

    pub fn num_pairs(&self) -> usize {
        self.partners.iter().flatten().count() / 2
    }

    pub fn to_dot_bracket(&self) -> String {
        self.partners
            .iter()
            .enumerate()
            .map(|(pos, partner)| match partner {
                Some(p) if *p > pos => '(',
                Some(_) => ')',
                None => '.',
            })
            .collect()
    }
}
