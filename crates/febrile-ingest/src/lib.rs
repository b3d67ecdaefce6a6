//! Patient data ingestion.
//!
//! Reads a CSV or XLSX file into ordered [`Record`](febrile_model::Record)s,
//! locates the column holding the actual diagnosis, normalizes its values to
//! the closed [`ClassLabel`](febrile_model::ClassLabel) set and groups rows by
//! class for balancing.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use febrile_ingest::{find_diagnosis_column, group_by_diagnosis, read_table};
//! use febrile_model::LabelPolicy;
//!
//! let table = read_table(Path::new("pacientes.csv"))?;
//! let column = find_diagnosis_column(&table.headers)?;
//! let grouped = group_by_diagnosis(&table, &column, LabelPolicy::Quarantine)?;
//! ```

mod diagnosis;
mod error;
mod grouping;
mod reader;

pub use diagnosis::{
    DIAGNOSIS_CODES, DIAGNOSIS_COLUMN_NAMES, DIAGNOSIS_KEYWORDS, find_diagnosis_column,
    normalize_diagnosis,
};
pub use error::{IngestError, Result};
pub use grouping::{GroupedRecords, UnrecognizedRow, group_by_diagnosis};
pub use reader::{DataTable, FileFormat, read_csv, read_table, read_xlsx};
