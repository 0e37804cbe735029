use crate::motif::Alignment;
use crate::utils::{open_text_reader, Result};
use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;
use std::path::Path;

/// One Stockholm alignment with its `#=GF` and `#=GC` annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord {
    pub header: BTreeMap<String, String>,
    pub column_info: BTreeMap<String, String>,
    pub alignment: Alignment,
}

impl AlignmentRecord {
    pub fn name(&self) -> &str {
        self.header
            .get("ID")
            .or_else(|| self.header.get("AC"))
            .map_or("unnamed", |s| s.as_str())
    }

    pub fn consensus_structure(&self) -> Result<&str> {
        self.column_info
            .get("SS_cons")
            .map(|s| s.as_str())
            .ok_or_else(|| format!("{}: missing #=GC SS_cons annotation", self.name()))
    }
}

#[derive(Default)]
struct RecordBuilder {
    header: BTreeMap<String, String>,
    column_info: BTreeMap<String, String>,
    row_index: HashMap<String, usize>,
    names: Vec<String>,
    rows: Vec<Vec<u8>>,
}

impl RecordBuilder {
    fn add_row(&mut self, name: &str, residues: &str) {
        let index = *self.row_index.entry(name.to_string()).or_insert_with(|| {
            self.names.push(name.to_string());
            self.rows.push(Vec::new());
            self.names.len() - 1
        });
        self.rows[index].extend_from_slice(residues.as_bytes());
    }

    fn name(&self) -> &str {
        self.header
            .get("ID")
            .or_else(|| self.header.get("AC"))
            .map_or("unnamed", |s| s.as_str())
    }

    fn is_empty(&self) -> bool {
        self.header.is_empty() && self.column_info.is_empty() && self.rows.is_empty()
    }

    fn finish(self) -> Result<AlignmentRecord> {
        let alignment = Alignment::new(self.names, self.rows)?;
        for (key, value) in &self.column_info {
            if value.len() != alignment.num_columns() {
                return Err(format!(
                    "#=GC {} has length {}, alignment has {} columns",
                    key,
                    value.len(),
                    alignment.num_columns()
                ));
            }
        }
        Ok(AlignmentRecord {
            header: self.header,
            column_info: self.column_info,
            alignment,
        })
    }
}

pub fn read_stockholm(path: &Path) -> Result<Vec<AlignmentRecord>> {
    let reader = open_text_reader(path)?;
    parse_stockholm(reader).map_err(|e| format!("{}: {}", path.display(), e))
}

pub fn parse_stockholm<R: BufRead>(reader: R) -> Result<Vec<AlignmentRecord>> {
    let mut records = Vec::new();
    let mut builder = RecordBuilder::default();

    for (line_number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| e.to_string())?;
        let error = |msg: &str| format!("Error at Stockholm line {}: {}", line_number + 1, msg);
        let line = line.trim_end();

        if line.is_empty() || line.starts_with("# STOCKHOLM") {
            continue;
        }
        if line == "//" {
            let record = std::mem::take(&mut builder);
            let name = record.name().to_string();
            match record.finish() {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping {}: {}", name, error(&e)),
            }
            continue;
        }
        if let Some(rest) = line.strip_prefix("#=GF") {
            let (key, value) = split_annotation(rest).ok_or_else(|| error("malformed #=GF line"))?;
            builder
                .header
                .entry(key.to_string())
                .and_modify(|v| {
                    v.push(' ');
                    v.push_str(value);
                })
                .or_insert_with(|| value.to_string());
            continue;
        }
        if let Some(rest) = line.strip_prefix("#=GC") {
            let (key, value) = split_annotation(rest).ok_or_else(|| error("malformed #=GC line"))?;
            builder
                .column_info
                .entry(key.to_string())
                .or_default()
                .push_str(value);
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (Some(name), Some(residues), None) => builder.add_row(name, residues),
            _ => return Err(error("expected <name> <aligned sequence>")),
        }
    }

    if !builder.is_empty() {
        return Err("Unterminated Stockholm record (missing //)".to_string());
    }
    Ok(records)
}

fn split_annotation(rest: &str) -> Option<(&str, &str)> {
    let rest = rest.trim_start();
    let split = rest.find(char::is_whitespace)?;
    let (key, value) = rest.split_at(split);
    Some((key, value.trim()))
}
