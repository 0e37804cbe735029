use crate::utils::{open_text_reader, GenomicRegion, Result};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

/// Known location of one family member in the reference collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePosition {
    pub family: String,
    pub seq_nr: usize,
    pub seq_name: String,
    pub region: GenomicRegion,
    pub reverse: bool,
}

impl ReferencePosition {
    /// Parses `family/seq_nr reference seq_name start end` with 1-based
    /// inclusive coordinates. `start > end` marks a reverse-strand record.
    pub fn from_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(format!("Expected 5 fields, found {}", fields.len()));
        }
        let (family, seq_nr) = fields[0]
            .split_once('/')
            .ok_or_else(|| format!("Invalid member identifier: {}", fields[0]))?;
        let seq_nr: usize = seq_nr
            .parse()
            .map_err(|_| format!("Invalid sequence number: {}", seq_nr))?;
        let parse_coord = |s: &str| -> Result<usize> {
            match s.parse::<usize>() {
                Ok(v) if v > 0 => Ok(v),
                _ => Err(format!("Invalid coordinate: {}", s)),
            }
        };
        let start = parse_coord(fields[3])?;
        let end = parse_coord(fields[4])?;
        let reverse = start > end;
        let (low, high) = if reverse { (end, start) } else { (start, end) };

        Ok(Self {
            family: family.to_string(),
            seq_nr,
            seq_name: fields[2].to_string(),
            region: GenomicRegion::new(fields[1], low - 1, high)?,
            reverse,
        })
    }
}

pub type ReferencePositions = HashMap<String, Vec<ReferencePosition>>;

/// Reads the position table grouped by family. Reverse-strand records are
/// dropped unless `include_reverse` is set.
pub fn read_reference_positions(path: &Path, include_reverse: bool) -> Result<ReferencePositions> {
    let reader = open_text_reader(path)?;
    let mut positions = ReferencePositions::new();
    for (line_number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| e.to_string())?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let record = ReferencePosition::from_line(&line)
            .map_err(|e| format!("Error at reference line {}: {}", line_number + 1, e))?;
        if record.reverse && !include_reverse {
            continue;
        }
        positions
            .entry(record.family.clone())
            .or_default()
            .push(record);
    }
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parse_forward_record() {
        let record = ReferencePosition::from_line("RF00005/12 chunk3 AB0001.1 101 172").unwrap();
        assert_eq!(record.family, "RF00005");
        assert_eq!(record.seq_nr, 12);
        assert_eq!(record.region, GenomicRegion::new("chunk3", 100, 172).unwrap());
        assert!(!record.reverse);
    }

    #[test]
    fn parse_reverse_record() {
        let record = ReferencePosition::from_line("RF00005/1 chunk1 X 50 11").unwrap();
        assert!(record.reverse);
        assert_eq!((record.region.start, record.region.end), (10, 50));
    }

    #[test]
    fn malformed_record_is_an_error() {
        assert_eq!(
            ReferencePosition::from_line("RF00005 chunk1 X 1 10"),
            Err("Invalid member identifier: RF00005".to_string())
        );
        assert!(ReferencePosition::from_line("RF00005/1 chunk1 X 0 10").is_err());
    }

    #[test]
    fn reverse_records_are_excluded_by_default() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "RF1/1 chunk1 a 1 10").unwrap();
        writeln!(file, "RF1/2 chunk1 b 30 21").unwrap();
        writeln!(file, "RF2/1 chunk2 c 5 9").unwrap();

        let positions = read_reference_positions(file.path(), false).unwrap();
        assert_eq!(positions["RF1"].len(), 1);
        assert_eq!(positions["RF2"].len(), 1);

        let positions = read_reference_positions(file.path(), true).unwrap();
        assert_eq!(positions["RF1"].len(), 2);
    }

    #[test]
    fn bad_line_reports_line_number() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "RF1/1 chunk1 a 1 10").unwrap();
        writeln!(file, "RF1/x chunk1 a 1 10").unwrap();
        let err = read_reference_positions(file.path(), false).unwrap_err();
        assert_eq!(err, "Error at reference line 2: Invalid sequence number: x");
    }
}
