use std::fmt::Write;

use client_core::{ListSnapshot, SortDirection, SortField};
use shared::{domain::EmployeeRecord, error::ValidationError};

const COLUMNS: [SortField; 5] = SortField::ALL;

fn header(field: SortField, snapshot: &ListSnapshot) -> String {
    let label = field.column_label();
    if snapshot.query.sort_field != Some(field) {
        return label.to_string();
    }
    match snapshot.query.sort_direction {
        Some(SortDirection::Ascending) => format!("{label} ▲"),
        Some(SortDirection::Descending) => format!("{label} ▼"),
        None => label.to_string(),
    }
}

fn cell(field: SortField, row: &EmployeeRecord) -> String {
    match field {
        SortField::Id => row.id.to_string(),
        SortField::Name => row.name.clone(),
        SortField::Email => row.email.clone(),
        SortField::Department => row.department_label().to_string(),
        SortField::DateOfBirth => row.date_of_birth_display(),
    }
}

fn pad(out: &mut String, text: &str, width: usize) {
    out.push_str(text);
    let len = text.chars().count();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
}

pub fn render_table(snapshot: &ListSnapshot) -> String {
    let headers: Vec<String> = COLUMNS.iter().map(|f| header(*f, snapshot)).collect();
    let cells: Vec<Vec<String>> = snapshot
        .rows
        .iter()
        .map(|row| COLUMNS.iter().map(|f| cell(*f, row)).collect())
        .collect();

    let widths: Vec<usize> = (0..COLUMNS.len())
        .map(|i| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(headers[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let line = |values: &[String], out: &mut String| {
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            pad(out, value, widths[i]);
        }
        let trimmed = out.trim_end_matches(' ').len();
        out.truncate(trimmed);
        out.push('\n');
    };

    line(&headers, &mut out);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    line(&rule, &mut out);
    if cells.is_empty() {
        out.push_str("(no employees)\n");
    }
    for row in &cells {
        line(row, &mut out);
    }

    let _ = write!(
        out,
        "{}  page {}/{}",
        snapshot.range_label(),
        snapshot.query.page_index + 1,
        snapshot.page_count().max(1)
    );
    if let Some(search) = &snapshot.query.search_key {
        let _ = write!(out, "  search: \"{search}\"");
    }
    if snapshot.loading {
        out.push_str("  (loading…)");
    }
    out.push('\n');
    out
}

pub fn render_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|err| format!("  {}: {err}\n", err.field()))
        .collect()
}
