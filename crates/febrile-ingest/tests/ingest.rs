use std::fs;
use std::path::PathBuf;

use febrile_ingest::{
    FileFormat, IngestError, find_diagnosis_column, group_by_diagnosis, read_table,
};
use febrile_model::{CellValue, ClassLabel, LabelPolicy};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

const PATIENTS: &str = "\
Edad,Plaquetas,Fiebre,Diagnostico
25,80,Sí,Dengue
,,,
40,150,No,2
33,120,Sí,Leptospirosis
51,90,Sí,Zika
19,70,Sí,
";

#[test]
fn reads_csv_and_skips_blank_rows() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "pacientes.csv", PATIENTS);
    let table = read_table(&path).expect("read csv");
    assert_eq!(table.format, FileFormat::Csv);
    assert_eq!(table.headers, vec!["Edad", "Plaquetas", "Fiebre", "Diagnostico"]);
    assert_eq!(table.len(), 5);
    assert_eq!(
        table.records[0].get("Fiebre"),
        Some(&CellValue::Text("Sí".to_string()))
    );
    assert_eq!(table.records[4].get("Diagnostico"), Some(&CellValue::Empty));
    assert_eq!(table.row_numbers, vec![1, 3, 4, 5, 6]);
}

#[test]
fn short_rows_are_padded_with_empty_cells() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "short.csv", "A,B,Label\n1,2\n");
    let table = read_table(&path).expect("read csv");
    assert_eq!(table.records[0].get("Label"), Some(&CellValue::Empty));
}

#[test]
fn header_only_file_is_empty() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "vacio.csv", "Edad,Diagnostico\n");
    assert!(matches!(
        read_table(&path),
        Err(IngestError::EmptyFile { .. })
    ));
}

#[test]
fn rejects_unsupported_extension() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "pacientes.txt", PATIENTS);
    assert!(matches!(
        read_table(&path),
        Err(IngestError::UnsupportedFormat { .. })
    ));
}

#[test]
fn missing_file_is_reported() {
    let err = read_table(std::path::Path::new("/nonexistent/pacientes.csv")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn missing_diagnosis_column_lists_columns() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "sin_dx.csv", "Edad,Plaquetas,Resultado\n25,80,x\n");
    let table = read_table(&path).expect("read csv");
    let err = find_diagnosis_column(&table.headers).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("diagnosis column not found"));
    assert!(message.contains("Edad, Plaquetas, Resultado"));
}

#[test]
fn groups_rows_and_quarantines_unknown_labels() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "pacientes.csv", PATIENTS);
    let table = read_table(&path).expect("read csv");
    let column = find_diagnosis_column(&table.headers).expect("column");
    let grouped =
        group_by_diagnosis(&table, &column, LabelPolicy::Quarantine).expect("group rows");

    assert_eq!(grouped.records(ClassLabel::Dengue).len(), 1);
    assert_eq!(grouped.records(ClassLabel::Malaria).len(), 1);
    assert_eq!(grouped.records(ClassLabel::Leptospirosis).len(), 1);
    assert_eq!(grouped.total(), 3);
    assert_eq!(grouped.blank_diagnosis, 1);
    assert_eq!(grouped.unrecognized.len(), 1);
    // Data row 5: the blank second row still counts.
    assert_eq!(grouped.unrecognized[0].row, 5);
    assert_eq!(grouped.unrecognized[0].value, "Zika");

    let counts = grouped.counts();
    assert_eq!(counts.get(ClassLabel::Malaria).original, 1);
    assert_eq!(counts.total_original(), 3);
}

#[test]
fn reject_policy_fails_on_unknown_label() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(&dir, "pacientes.csv", PATIENTS);
    let table = read_table(&path).expect("read csv");
    let err = group_by_diagnosis(&table, "Diagnostico", LabelPolicy::Reject).unwrap_err();
    match err {
        IngestError::UnrecognizedDiagnosis { row, value } => {
            assert_eq!(row, 5);
            assert_eq!(value, "Zika");
        }
        other => panic!("expected UnrecognizedDiagnosis, got {other:?}"),
    }
}

/// First sheet: an unnamed column, a blank row and a numeric diagnosis code.
/// Second sheet: a table that must be ignored.
fn write_workbook(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("pacientes.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Pacientes").expect("sheet name");
    for (col, header) in [(0, "Edad"), (1, " Plaquetas "), (3, "Fiebre"), (4, "Diagnostico")] {
        sheet.write_string(0, col, header).expect("header");
    }
    sheet.write_number(1, 0, 25).expect("cell");
    sheet.write_number(1, 1, 80.5).expect("cell");
    sheet.write_string(1, 2, "nota").expect("cell");
    sheet.write_string(1, 3, "Sí").expect("cell");
    sheet.write_number(1, 4, 2).expect("cell");
    sheet.write_number(3, 0, 40).expect("cell");
    sheet.write_number(3, 1, 150).expect("cell");
    sheet.write_string(3, 3, "No").expect("cell");
    sheet.write_string(3, 4, "Zika").expect("cell");
    let notes = workbook.add_worksheet();
    notes.write_string(0, 0, "Comentario").expect("cell");
    notes.write_string(1, 0, "Dengue").expect("cell");
    workbook.save(&path).expect("save workbook");
    path
}

#[test]
fn reads_first_worksheet_of_workbook() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_workbook(&dir);
    let table = read_table(&path).expect("read xlsx");
    assert_eq!(table.format, FileFormat::Xlsx);
    assert_eq!(table.headers, vec!["Edad", "Plaquetas", "Fiebre", "Diagnostico"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.row_numbers, vec![1, 3]);

    let first = &table.records[0];
    assert_eq!(first.get("Edad"), Some(&CellValue::Number(25.0)));
    assert_eq!(first.get("Plaquetas"), Some(&CellValue::Number(80.5)));
    assert_eq!(first.get("Fiebre"), Some(&CellValue::Text("Sí".to_string())));
    assert_eq!(first.get("Diagnostico"), Some(&CellValue::Number(2.0)));
    assert_eq!(first.len(), 4);
}

#[test]
fn workbook_rows_group_by_numeric_code() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_workbook(&dir);
    let table = read_table(&path).expect("read xlsx");
    let column = find_diagnosis_column(&table.headers).expect("column");
    let grouped =
        group_by_diagnosis(&table, &column, LabelPolicy::Quarantine).expect("group rows");
    assert_eq!(grouped.records(ClassLabel::Malaria).len(), 1);
    assert_eq!(grouped.total(), 1);
    assert_eq!(grouped.unrecognized.len(), 1);
    assert_eq!(grouped.unrecognized[0].row, 3);
}

#[test]
fn header_only_worksheet_is_empty() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("vacio.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Edad").expect("header");
    sheet.write_string(0, 1, "Diagnostico").expect("header");
    workbook.save(&path).expect("save workbook");
    assert!(matches!(
        read_table(&path),
        Err(IngestError::EmptyFile { .. })
    ));
}
