use std::fmt;

/// Number of distinct symbols in a single-base profile column.
pub const BASE_RADIX: usize = 4;
/// Number of distinct symbols in a base-pair profile column.
pub const PAIR_RADIX: usize = BASE_RADIX * BASE_RADIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Base {
    A,
    C,
    G,
    U,
}

impl Base {
    pub const ALL: [Base; BASE_RADIX] = [Base::A, Base::C, Base::G, Base::U];

    /// Maps an alignment character to a base. `T` is read as `U`; gaps and
    /// ambiguity codes are not bases.
    pub fn from_ascii(c: u8) -> Option<Base> {
        match c.to_ascii_uppercase() {
            b'A' => Some(Base::A),
            b'C' => Some(Base::C),
            b'G' => Some(Base::G),
            b'U' | b'T' => Some(Base::U),
            _ => None,
        }
    }

    pub fn from_code(code: u8) -> Option<Base> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn as_rna(self) -> u8 {
        b"ACGU"[self as usize]
    }

    pub fn as_dna(self) -> u8 {
        b"ACGT"[self as usize]
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_rna() as char)
    }
}

/// Joint symbol of a base pair, 5' base in the high digit.
pub fn pair_code(five_prime: Base, three_prime: Base) -> u8 {
    five_prime.code() * BASE_RADIX as u8 + three_prime.code()
}

pub fn split_pair_code(code: u8) -> Option<(Base, Base)> {
    if code as usize >= PAIR_RADIX {
        return None;
    }
    let five_prime = Base::from_code(code / BASE_RADIX as u8)?;
    let three_prime = Base::from_code(code % BASE_RADIX as u8)?;
    Some((five_prime, three_prime))
}

pub fn is_gap(c: u8) -> bool {
    matches!(c, b'-' | b'.' | b'_' | b'~')
}

/// Packs the bases of `seq` two bits each, skipping gap characters.
/// Distinct for ungapped sequences of up to 32 bases.
pub fn hash_sequence(seq: &[u8]) -> u64 {
    seq.iter()
        .filter_map(|&c| Base::from_ascii(c))
        .fold(0u64, |hash, base| (hash << 2) | base.code() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_ascii_reads_dna_and_rna() {
        assert_eq!(Base::from_ascii(b't'), Some(Base::U));
        assert_eq!(Base::from_ascii(b'U'), Some(Base::U));
        assert_eq!(Base::from_ascii(b'g'), Some(Base::G));
        assert_eq!(Base::from_ascii(b'-'), None);
        assert_eq!(Base::from_ascii(b'N'), None);
    }

    #[test]
    fn pair_code_round_trips_through_split() {
        let code = pair_code(Base::G, Base::U);
        assert_eq!(code, 11);
        assert_eq!(split_pair_code(code), Some((Base::G, Base::U)));
        assert_eq!(split_pair_code(16), None);
    }

    #[test]
    fn hash_skips_gaps_and_ignores_case() {
        assert_eq!(hash_sequence(b"AC-G.U"), hash_sequence(b"acgt"));
        assert_eq!(hash_sequence(b"ACGU"), 0b00_01_10_11);
        assert_ne!(hash_sequence(b"ACGU"), hash_sequence(b"UGCA"));
    }
}
