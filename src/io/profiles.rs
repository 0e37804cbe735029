//! Tab-separated writers for motif profile statistics.
use crate::motif::{Motif, StemLoop};
use crate::utils::Result;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Summary of one stem-loop's search space.
#[derive(Debug, Clone, PartialEq)]
pub struct StemLoopSummary {
    pub seed_length: usize,
    pub search_space: u64,
}

/// One row per structural element.
pub struct ProfileWriter {
    writer: BufWriter<File>,
}

impl ProfileWriter {
    pub fn new(output_path: &str) -> Result<ProfileWriter> {
        let file = File::create(output_path)
            .map_err(|e| format!("Failed to create {}: {}", output_path, e))?;
        let mut writer = BufWriter::new(file);
        writeln!(
            writer,
            "#family\tstem_loop\telement\ttype\tcolumns\tmin_length\tmean_length\tmax_length\tentropy"
        )
        .map_err(|e| e.to_string())?;
        Ok(ProfileWriter { writer })
    }

    pub fn write(&mut self, motif: &Motif, index: usize, stem_loop: &StemLoop) {
        for (element_index, element) in stem_loop.elements.iter().enumerate() {
            let stats = &element.components[0].stats;
            if let Err(e) = writeln!(
                self.writer,
                "{}\t{}\t{}\t{}\t{}\t{}\t{:.2}\t{}\t{:.4}",
                motif.name(),
                index,
                element_index,
                element.kind,
                element.column_ranges(),
                stats.min,
                stats.mean,
                stats.max,
                element.entropy()
            ) {
                log::error!("Failed to write profile of {}: {}", motif.name(), e);
                return;
            }
        }
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush().map_err(|e| e.to_string())
    }
}

/// One row per stem-loop.
pub struct StemLoopWriter {
    writer: BufWriter<File>,
}

impl StemLoopWriter {
    pub fn new(output_path: &str) -> Result<StemLoopWriter> {
        let file = File::create(output_path)
            .map_err(|e| format!("Failed to create {}: {}", output_path, e))?;
        let mut writer = BufWriter::new(file);
        writeln!(
            writer,
            "#family\tstem_loop\tstart\tend\telements\tseed_length\tsearch_space"
        )
        .map_err(|e| e.to_string())?;
        Ok(StemLoopWriter { writer })
    }

    pub fn write(&mut self, motif: &Motif, index: usize, stem_loop: &StemLoop, summary: &StemLoopSummary) {
        if let Err(e) = writeln!(
            self.writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            motif.name(),
            index,
            stem_loop.span.start,
            stem_loop.span.end,
            stem_loop.elements.len(),
            summary.seed_length,
            summary.search_space
        ) {
            log::error!("Failed to write stem-loop of {}: {}", motif.name(), e);
        }
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush().map_err(|e| e.to_string())
    }
}
