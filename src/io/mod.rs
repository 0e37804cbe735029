mod hits;
mod positions;
mod profiles;
mod reference;
mod stockholm;

pub use hits::HitWriter;
pub use positions::{read_reference_positions, ReferencePosition, ReferencePositions};
pub use profiles::{ProfileWriter, StemLoopSummary, StemLoopWriter};
pub use reference::{read_references, ReferenceSequence};
pub use stockholm::{parse_stockholm, read_stockholm, AlignmentRecord};
