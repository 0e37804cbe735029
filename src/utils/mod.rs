mod io_utils;
mod readers;
mod region;
mod stats;
mod util;

pub use io_utils::create_writer;
pub use readers::open_text_reader;
pub use region::GenomicRegion;
pub use stats::{calculate_stats, Stats};
pub use util::{format_number_with_commas, handle_error_and_exit, Result};
