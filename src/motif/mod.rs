mod alignment;
mod base;
mod builder;
mod element;
mod pairing;
mod profile;
mod structure;

pub use alignment::Alignment;
pub use base::{hash_sequence, is_gap, pair_code, split_pair_code, Base, BASE_RADIX, PAIR_RADIX};
pub use builder::{build_motif, build_motifs, Motif, MotifParams, StemLoop};
pub use element::{StructuralElement, StructureType, MIN_HAIRPIN_LENGTH};
pub use pairing::ConsensusPairing;
pub use profile::{column_entropy, LengthStats, ProfileComponent};
pub use structure::{find_stem_loops, partition, StemLoopSpan};
