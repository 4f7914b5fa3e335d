use std::path::Path;

use calamine::{DataType, Range, Reader, Sheets, open_workbook_auto};
use tracing::debug;

use crate::netbuild::tools::error::{Result, ToolError};
use crate::netbuild::tools::ingest::{CellValue, SheetTable};

/// Reads every worksheet of an xls, xlsx, xlsb or ods workbook into
/// [`SheetTable`]s, in tab order. The first used row of each sheet is its
/// header.
pub fn read_workbook(path: &Path) -> Result<Vec<SheetTable>> {
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_owned();

    let mut tables = Vec::with_capacity(names.len());
    for name in &names {
        let range = read_required_sheet(&mut workbook, name)?;
        tables.push(range_to_table(name, &range));
    }
    Ok(tables)
}

fn read_required_sheet<RS: std::io::Read + std::io::Seek>(
    workbook: &mut Sheets<RS>,
    name: &str,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

fn range_to_table(name: &str, range: &Range<DataType>) -> SheetTable {
    let header_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut rows = range.rows();

    let columns: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .map(|cell| coerce_cell(cell).to_text().trim().to_string())
            .collect(),
        None => Vec::new(),
    };
    let rows: Vec<Vec<CellValue>> = rows.map(|row| row.iter().map(coerce_cell).collect()).collect();

    debug!(sheet = name, header_row, row_count = rows.len(), "worksheet read");
    SheetTable {
        sheet_name: name.to_string(),
        header_row,
        columns,
        rows,
    }
}

/// The single coercion applied to every cell.
pub fn coerce_cell(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty => CellValue::Empty,
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Int(value) => CellValue::Integer(*value),
        DataType::Float(value) => CellValue::from_float(*value),
        DataType::Bool(value) => CellValue::Bool(*value),
        other => CellValue::Text(other.to_string()),
    }
}
