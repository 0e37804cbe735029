//! Tab-separated writer for search hits.
use crate::search::Hit;
use crate::utils::Result;
use std::fs::File;
use std::io::{BufWriter, Write};

pub struct HitWriter {
    writer: BufWriter<File>,
}

impl HitWriter {
    /// Creates the output file and writes the column header.
    ///
    /// # Arguments
    /// * `output_path` - Path of the output TSV file.
    pub fn new(output_path: &str) -> Result<HitWriter> {
        let file = File::create(output_path)
            .map_err(|e| format!("Failed to create {}: {}", output_path, e))?;
        let mut writer = BufWriter::new(file);
        writeln!(
            writer,
            "#family\tstem_loop\treference\tstart\tend\tstrand\tcandidate\tprobability"
        )
        .map_err(|e| e.to_string())?;
        Ok(HitWriter { writer })
    }

    /// Writes one hit; start is 0-based, end exclusive.
    pub fn write(&mut self, hit: &Hit) {
        if let Err(e) = writeln!(
            self.writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.6}",
            hit.family,
            hit.stem_loop,
            hit.reference,
            hit.start,
            hit.end,
            hit.strand,
            hit.candidate,
            hit.probability
        ) {
            log::error!("Failed to write hit for {}: {}", hit.family, e);
        }
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush().map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Strand;

    #[test]
    fn hits_are_written_as_tsv() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().to_string();
        let mut writer = HitWriter::new(&path).unwrap();
        writer.write(&Hit {
            family: "RF00005".into(),
            stem_loop: 1,
            candidate: "GCAAGC".into(),
            probability: 0.25,
            reference: "chunk2".into(),
            start: 40,
            end: 46,
            strand: Strand::Reverse,
        });
        writer.finish().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "RF00005\t1\tchunk2\t40\t46\t-\tGCAAGC\t0.250000");
    }
}
