//! CSV and XLSX reading into ordered records.

use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use csv::ReaderBuilder;
use tracing::{debug, warn};

use febrile_model::{CellValue, Record};

use crate::error::{IngestError, Result};

/// Supported spreadsheet formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Detects the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(FileFormat::Csv),
            Some("xlsx") => Ok(FileFormat::Xlsx),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// A loaded dataset: header order plus one record per non-blank row.
#[derive(Debug, Clone)]
pub struct DataTable {
    pub source: PathBuf,
    pub format: FileFormat,
    pub headers: Vec<String>,
    pub records: Vec<Record>,
    /// 1-based data row of each record in the source file, header excluded.
    /// Blank rows are dropped from `records` but still counted here.
    pub row_numbers: Vec<usize>,
}

impl DataTable {
    /// Records paired with their source data row number.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &Record)> {
        self.row_numbers.iter().copied().zip(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reads a CSV or XLSX file, dispatching on the extension.
///
/// Fails with [`IngestError::EmptyFile`] when no data rows remain after
/// blank rows are dropped.
pub fn read_table(path: &Path) -> Result<DataTable> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let table = match FileFormat::from_path(path)? {
        FileFormat::Csv => read_csv(path)?,
        FileFormat::Xlsx => read_xlsx(path)?,
    };
    if table.is_empty() {
        return Err(IngestError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.len(),
        "table loaded"
    );
    Ok(table)
}

/// Reads a comma-delimited file with a mandatory header row.
pub fn read_csv(path: &Path) -> Result<DataTable> {
    let csv_error = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(normalize_header)
        .collect();
    let mut records = Vec::new();
    let mut row_numbers = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row.map_err(csv_error)?;
        let mut record = Record::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            record.insert(header.as_str(), CellValue::from_text(row.get(idx).unwrap_or("")));
        }
        if record.is_blank() {
            continue;
        }
        records.push(record);
        row_numbers.push(idx + 1);
    }
    Ok(DataTable {
        source: path.to_path_buf(),
        format: FileFormat::Csv,
        headers,
        records,
        row_numbers,
    })
}

/// Reads the first worksheet of a workbook; its first row is the header.
pub fn read_xlsx(path: &Path) -> Result<DataTable> {
    let workbook_error = |message: String| IngestError::Workbook {
        path: path.to_path_buf(),
        message,
    };
    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let sheet_names = workbook.sheet_names();
    let Some(first_sheet) = sheet_names.first() else {
        return Err(IngestError::NoWorksheet {
            path: path.to_path_buf(),
        });
    };
    if sheet_names.len() > 1 {
        warn!(
            path = %path.display(),
            sheet = %first_sheet,
            ignored = sheet_names.len() - 1,
            "only the first worksheet is read"
        );
    }
    let range = workbook
        .worksheet_range(first_sheet)
        .map_err(|e| workbook_error(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row
            .iter()
            .map(|cell| normalize_header(&cell_to_value(cell).as_text()))
            .collect(),
        None => Vec::new(),
    };
    let mut records = Vec::new();
    let mut row_numbers = Vec::new();
    for (idx, row) in rows.enumerate() {
        let mut record = Record::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let value = row.get(idx).map(cell_to_value).unwrap_or_default();
            record.insert(header.as_str(), value);
        }
        if record.is_blank() {
            continue;
        }
        records.push(record);
        row_numbers.push(idx + 1);
    }
    Ok(DataTable {
        source: path.to_path_buf(),
        format: FileFormat::Xlsx,
        headers: headers.into_iter().filter(|h| !h.is_empty()).collect(),
        records,
        row_numbers,
    })
}

fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Float(value) => CellValue::Number(*value),
        Data::Bool(flag) => CellValue::Text(flag.to_string()),
        Data::String(text) => CellValue::from_text(text),
        other => CellValue::from_text(&other.to_string()),
    }
}
