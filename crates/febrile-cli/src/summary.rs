use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use febrile_cli::types::{EvaluationRun, PredictedSample};
use febrile_model::ClassLabel;
use febrile_predict::Prediction;

/// Unrecognized rows listed individually before collapsing to a count.
const UNRECOGNIZED_SHOWN: usize = 10;

pub fn print_evaluation(run: &EvaluationRun) {
    println!("Source: {}", run.source.display());
    println!("Model: {}", run.options.model.display_name());
    println!("Diagnosis column: {}", run.diagnosis_column);
    if let Some(path) = &run.outputs.results_csv {
        println!("Results: {}", path.display());
    }
    if let Some(path) = &run.outputs.report {
        println!("Report: {}", path.display());
    }
    print_distribution(run);
    print_metrics(run);
    print_confusion_matrix(run);
    print_class_metrics(run);
    print_preview(&run.predictions, run.options.preview_rows);
    print_data_issues(run);
}

pub fn print_prediction(prediction: &Prediction) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Model"),
        header_cell("Diagnosis"),
        header_cell("Confidence"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    table.add_row(vec![
        Cell::new(prediction.model.display_name()),
        label_cell(prediction.label),
        Cell::new(format!("{:.2}%", prediction.confidence)).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    println!("Rule-based demonstration only; not a clinical diagnosis.");
}

fn print_distribution(run: &EvaluationRun) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Class"),
        header_cell("Original"),
        header_cell("Synthetic"),
        header_cell("Total"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for count in run.counts.iter() {
        table.add_row(vec![
            label_cell(count.label),
            Cell::new(count.original),
            count_cell(count.synthetic, Color::Magenta),
            Cell::new(count.total()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(run.counts.total_original()).add_attribute(Attribute::Bold),
        count_cell(run.counts.total_synthetic(), Color::Magenta).add_attribute(Attribute::Bold),
        Cell::new(run.counts.total()).add_attribute(Attribute::Bold),
    ]);
    println!();
    println!("Class distribution:");
    println!("{table}");
}

fn print_metrics(run: &EvaluationRun) {
    let metrics = &run.evaluation.metrics;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (name, value) in [
        ("Accuracy", metrics.accuracy),
        ("Precision", metrics.precision),
        ("Recall", metrics.recall),
        ("F1-score", metrics.f1_score),
    ] {
        table.add_row(vec![Cell::new(name), percent_cell(value)]);
    }
    println!();
    println!(
        "Metrics ({} evaluated, {} skipped):",
        run.evaluation.evaluated(),
        run.evaluation.skipped
    );
    println!("{table}");
}

fn print_confusion_matrix(run: &EvaluationRun) {
    let matrix = &run.evaluation.matrix;
    let mut table = Table::new();
    let mut header = vec![header_cell("Actual \\ Predicted")];
    header.extend(ClassLabel::ALL.map(|label| header_cell(label.as_str())));
    table.set_header(header);
    apply_summary_table_style(&mut table);
    for index in 1..=ClassLabel::COUNT {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for actual in ClassLabel::ALL {
        let mut row = vec![label_cell(actual)];
        for predicted in ClassLabel::ALL {
            let count = matrix.get(actual, predicted);
            row.push(if actual == predicted {
                Cell::new(count).fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                count_cell(count, Color::Red)
            });
        }
        table.add_row(row);
    }
    println!();
    println!("Confusion matrix:");
    println!("{table}");
}

fn print_class_metrics(run: &EvaluationRun) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Class"),
        header_cell("Precision"),
        header_cell("Recall"),
        header_cell("F1"),
        header_cell("TP"),
        header_cell("FP"),
        header_cell("FN"),
        header_cell("TN"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for class in &run.class_metrics {
        table.add_row(vec![
            label_cell(class.label),
            percent_cell(class.precision),
            percent_cell(class.recall),
            percent_cell(class.f1_score),
            Cell::new(class.true_positives),
            count_cell(class.false_positives, Color::Red),
            count_cell(class.false_negatives, Color::Red),
            Cell::new(class.true_negatives),
        ]);
    }
    println!();
    println!("Per-class metrics:");
    println!("{table}");
}

fn print_preview(predictions: &[PredictedSample], rows: usize) {
    if rows == 0 || predictions.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Patient"),
        header_cell("Actual"),
        header_cell("Predicted"),
        header_cell("Synthetic"),
        header_cell("Match"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Center);
    for prediction in predictions.iter().take(rows) {
        table.add_row(vec![
            Cell::new(prediction.patient_id),
            label_cell(prediction.actual),
            label_cell(prediction.predicted),
            if prediction.synthetic {
                Cell::new("yes").fg(Color::Magenta)
            } else {
                dim_cell("-")
            },
            match_cell(prediction.is_correct()),
        ]);
    }
    println!();
    if predictions.len() > rows {
        println!("Predictions (first {rows} of {}):", predictions.len());
    } else {
        println!("Predictions:");
    }
    println!("{table}");
}

fn print_data_issues(run: &EvaluationRun) {
    if run.unrecognized.is_empty() && run.blank_diagnosis == 0 && run.excluded_missing == 0 {
        return;
    }
    eprintln!();
    eprintln!("Data issues:");
    if run.blank_diagnosis > 0 {
        eprintln!("- {} rows without a diagnosis were skipped", run.blank_diagnosis);
    }
    if run.excluded_missing > 0 {
        eprintln!(
            "- {} rows lacking platelets, temperature or hemoglobin were excluded",
            run.excluded_missing
        );
    }
    if !run.unrecognized.is_empty() {
        eprintln!(
            "- {} rows with an unrecognized diagnosis were quarantined:",
            run.unrecognized.len()
        );
        for row in run.unrecognized.iter().take(UNRECOGNIZED_SHOWN) {
            eprintln!("    row {}: {}", row.row, row.value);
        }
        if run.unrecognized.len() > UNRECOGNIZED_SHOWN {
            eprintln!(
                "    ... and {} more",
                run.unrecognized.len() - UNRECOGNIZED_SHOWN
            );
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn label_cell(label: ClassLabel) -> Cell {
    let color = match label {
        ClassLabel::Dengue => Color::Red,
        ClassLabel::Malaria => Color::Yellow,
        ClassLabel::Leptospirosis => Color::Blue,
    };
    Cell::new(label).fg(color)
}

fn percent_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.2}%"))
}

fn count_cell<T: PartialEq + Default + ToString>(count: T, color: Color) -> Cell {
    if count == T::default() {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    }
}

fn match_cell(correct: bool) -> Cell {
    if correct {
        Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new("✗").fg(Color::Red)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
