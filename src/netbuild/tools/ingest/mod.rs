//! Record ingestion.
//!
//! A workbook arrives as a list of [`SheetTable`]s (header row plus data rows,
//! whatever the physical source). Ingestion turns each table into an ordered
//! list of [`Record`]s keyed by column header and tagged with the spreadsheet
//! row they came from.

pub mod rows;
pub mod sanitize;

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::netbuild::tools::error::Result;

/// Sheet holding human instructions; never ingested.
pub const INSTRUCTIONS_SHEET: &str = "Instructions";

/// The sheets the generator understands, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sheet {
    Variables,
    ConfigTemplates,
    Profiles,
    Vlans,
    Vrf,
    Interfaces,
    PortChannels,
    StaticRoutes,
    PrefixList,
}

impl Sheet {
    /// Every known sheet in declaration order.
    pub const ALL: [Sheet; 9] = [
        Sheet::Variables,
        Sheet::ConfigTemplates,
        Sheet::Profiles,
        Sheet::Vlans,
        Sheet::Vrf,
        Sheet::Interfaces,
        Sheet::PortChannels,
        Sheet::StaticRoutes,
        Sheet::PrefixList,
    ];

    /// Worksheet tab name as it appears in the workbook.
    pub fn name(self) -> &'static str {
        match self {
            Sheet::Variables => "variables",
            Sheet::ConfigTemplates => "config-templates",
            Sheet::Profiles => "profiles",
            Sheet::Vlans => "vlans",
            Sheet::Vrf => "vrf",
            Sheet::Interfaces => "interfaces",
            Sheet::PortChannels => "portchannels",
            Sheet::StaticRoutes => "static routes",
            Sheet::PrefixList => "prefix-list",
        }
    }

    pub fn from_name(name: &str) -> Option<Sheet> {
        Sheet::ALL.into_iter().find(|sheet| sheet.name() == name)
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single cell after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Coerces a floating point cell. Integral values within the `i64` range
    /// become [`CellValue::Integer`]; everything else keeps its fractional
    /// form. No rounding or truncation ever happens.
    pub fn from_float(value: f64) -> CellValue {
        let in_range = value >= i64::MIN as f64 && value <= i64::MAX as f64;
        if value.is_finite() && value.fract() == 0.0 && in_range {
            CellValue::Integer(value as i64)
        } else {
            CellValue::Number(value)
        }
    }

    /// Blank cells are empty or hold only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(text) => text.clone(),
            CellValue::Integer(value) => value.to_string(),
            CellValue::Number(value) => value.to_string(),
            CellValue::Bool(value) => value.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

/// One worksheet as handed over by the tabular source.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    /// Zero-based physical row index of the header row.
    pub header_row: usize,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    pub fn new(sheet_name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            header_row: 0,
            columns: columns.iter().map(|column| column.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a data row; handy for building tables in memory.
    pub fn with_row<I, C>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }
}

/// A data row keyed by column header.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub sheet: String,
    /// Spreadsheet row label (1-based, header included).
    pub row: usize,
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new(sheet: impl Into<String>, row: usize, fields: Vec<(String, CellValue)>) -> Self {
        Self {
            sheet: sheet.into(),
            row,
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Text of a field; missing columns read as blank.
    pub fn text(&self, field: &str) -> String {
        self.get(field).map(CellValue::to_text).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Decodes the record into one of the typed row structs in [`rows`].
    /// Every cell is presented as text; the row struct's serde attributes
    /// map column headers to fields. Legacy headers are renamed first, and
    /// when two columns land on the same field the leftmost one is kept.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let mut object = Map::new();
        for (name, value) in &self.fields {
            let key = rows::canonical_column(&self.sheet, name);
            if key.is_empty() || object.contains_key(key) {
                continue;
            }
            object.insert(key.to_string(), Value::String(value.to_text()));
        }
        Ok(serde_json::from_value(Value::Object(object))?)
    }
}

/// Ingested records, per sheet name, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    sheets: BTreeMap<String, Vec<Record>>,
}

impl RecordSet {
    pub fn records(&self, sheet: Sheet) -> &[Record] {
        self.sheets
            .get(sheet.name())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    pub fn get_mut(&mut self, sheet_name: &str) -> Option<&mut Vec<Record>> {
        self.sheets.get_mut(sheet_name)
    }

    pub fn insert(&mut self, sheet_name: impl Into<String>, records: Vec<Record>) {
        self.sheets.insert(sheet_name.into(), records);
    }

    pub fn len(&self) -> usize {
        self.sheets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds the record set for every sheet except [`INSTRUCTIONS_SHEET`].
#[instrument(level = "debug", skip_all, fields(sheet_count = tables.len()))]
pub fn ingest(tables: &[SheetTable]) -> RecordSet {
    let mut set = RecordSet::default();

    for table in tables {
        if table.sheet_name == INSTRUCTIONS_SHEET {
            debug!("skipping instructions sheet");
            continue;
        }
        if Sheet::from_name(&table.sheet_name).is_none() {
            debug!(sheet = %table.sheet_name, "sheet is not used by the generator");
        }

        let records = table
            .rows
            .iter()
            .enumerate()
            .map(|(index, cells)| {
                let fields = table
                    .columns
                    .iter()
                    .enumerate()
                    .map(|(col_idx, header)| {
                        let value = cells.get(col_idx).cloned().unwrap_or(CellValue::Empty);
                        (header.clone(), value)
                    })
                    .collect();
                // header_row is zero-based and the first data row sits below it.
                Record::new(table.sheet_name.clone(), table.header_row + index + 2, fields)
            })
            .collect::<Vec<_>>();

        debug!(sheet = %table.sheet_name, record_count = records.len(), "sheet ingested");
        set.insert(table.sheet_name.clone(), records);
    }

    info!(record_count = set.len(), "records ingested");
    set
}
