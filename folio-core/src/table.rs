// Output table built from assembled records

use crate::record::Record;
use indexmap::IndexSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(OutputFormat::Csv),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Records in sitemap order. Columns are the union of every record's keys,
/// in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    records: Vec<Record>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn columns(&self) -> Vec<String> {
        let mut columns: IndexSet<String> = IndexSet::new();
        for record in &self.records {
            for key in record.keys() {
                if !columns.contains(key) {
                    columns.insert(key.to_string());
                }
            }
        }
        columns.into_iter().collect()
    }

    /// Cells of row `index` aligned to `columns`; absent keys are empty.
    pub fn row(&self, index: usize, columns: &[String]) -> Option<Vec<String>> {
        let record = self.records.get(index)?;
        Some(
            columns
                .iter()
                .map(|c| record.get(c).map(|v| v.to_cell()).unwrap_or_default())
                .collect(),
        )
    }

    /// Delimited output with a leading unnamed row-index column.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let columns = self.columns();
        let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);

        let mut header = Vec::with_capacity(columns.len() + 1);
        header.push(String::new());
        header.extend(columns.iter().cloned());
        csv_writer.write_record(&header)?;

        for index in 0..self.records.len() {
            let mut row = vec![index.to_string()];
            row.extend(self.row(index, &columns).unwrap_or_default());
            csv_writer.write_record(&row)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// JSON array with one object per record; list fields stay arrays.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut writer = writer;
        serde_json::to_writer_pretty(&mut writer, &self.records)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// Creates (or truncates) `path` and writes the table in `format`.
    pub fn save(&self, path: &Path, format: OutputFormat) -> Result<(), TableError> {
        let mut file = BufWriter::new(File::create(path)?);
        match format {
            OutputFormat::Csv => self.write_csv(&mut file)?,
            OutputFormat::Json => self.write_json(&mut file)?,
        }
        file.flush()?;
        Ok(())
    }
}

impl FromIterator<Record> for ResultTable {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
