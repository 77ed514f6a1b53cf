//! CSV encoding of project variables.
//!
//! Export writes whatever fields the server returned, using the first
//! variable's field names as the header. Import ignores the header row and
//! reads every other row positionally with [`IMPORT_COLUMNS`].

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use serde_json::Value;

use crate::gitlab::error::{Result, SyncError};
use crate::gitlab::model::{FlagValue, Variable, VariableRecord, VariableType};

/// Column order of an import file.
pub const IMPORT_COLUMNS: [&str; 8] = [
    "variable_type",
    "key",
    "value",
    "protected",
    "masked",
    "raw",
    "environment_scope",
    "description",
];

/// Text written for one field. Strings are verbatim, `null` and absent
/// fields are empty, booleans are `True`/`False`, anything else is its JSON
/// text.
pub fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Writes `records` to `path` and returns the number of data rows.
///
/// The file is only created once every record has been checked against the
/// header, so a rejected export leaves no partial file behind.
pub fn write_variables(path: &Path, records: &[VariableRecord]) -> Result<usize> {
    let first = records.first().ok_or(SyncError::EmptyVariableList)?;
    let header: Vec<&str> = first.field_names().collect();

    for record in &records[1..] {
        if let Some(field) = record.field_names().find(|f| !header.contains(f)) {
            return Err(SyncError::UnexpectedField {
                key: record.key().unwrap_or_default().to_string(),
                field: field.to_string(),
            });
        }
    }

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(file);

    writer.write_record(&header)?;
    for record in records {
        writer.write_record(header.iter().map(|field| render_cell(record.get(field))))?;
    }
    writer.flush()?;

    Ok(records.len())
}

/// Reads an import file into variables, in file order.
///
/// The first row is skipped whatever it contains. Every data row is decoded
/// before anything is returned, so a malformed row rejects the whole file.
pub fn read_variables(path: &Path) -> Result<Vec<Variable>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut rows = reader.records();
    match rows.next() {
        Some(header) => {
            header?;
        }
        None => {
            return Err(SyncError::MalformedFile {
                line: 1,
                reason: "file is empty, expected a header row".to_string(),
            })
        }
    }

    rows.map(|row| decode_row(&row?)).collect()
}

fn decode_row(record: &StringRecord) -> Result<Variable> {
    let line = record.position().map_or(0, csv::Position::line);
    let malformed = |reason: String| SyncError::MalformedFile { line, reason };

    if record.len() != IMPORT_COLUMNS.len() {
        return Err(malformed(format!(
            "expected {} columns ({}), found {}",
            IMPORT_COLUMNS.len(),
            IMPORT_COLUMNS.join(", "),
            record.len()
        )));
    }

    let cell = |index: usize| record.get(index).unwrap_or_default().to_string();

    let variable_type = match record.get(0).unwrap_or_default() {
        "" => None,
        name => Some(VariableType::from_name(name)),
    };

    Ok(Variable {
        key: cell(1),
        value: cell(2),
        variable_type,
        protected: FlagValue::Text(cell(3)),
        masked: FlagValue::Text(cell(4)),
        raw: FlagValue::Text(cell(5)),
        environment_scope: cell(6),
        description: Some(cell(7)),
    })
}
