use std::collections::BTreeMap;
use std::path::Path;

use calamine::{Data, Range, Reader};
use tracing::{debug, info, warn};

use crate::classifier::{classify, SheetClass};
use crate::coercer::{coerce_forecast, coerce_ledger, LedgerView, FORECAST};
use crate::error::{DashError, Result};
use crate::forecast::Forecast;
use crate::ledger::Ledger;
use crate::models::{LedgerRecord, Source};

/// A sheet held in memory. Row 0 is the header row.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<Data>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Data>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn header(&self) -> &[Data] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn data_rows(&self) -> impl Iterator<Item = &[Data]> {
        self.rows.iter().skip(1).map(Vec::as_slice)
    }
}

#[derive(Debug, Clone)]
pub struct SheetStat {
    pub name: String,
    pub class: SheetClass,
    pub kept: usize,
    pub dropped: usize,
    /// A later sheet for the same bucket superseded this one.
    pub replaced: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    pub sheets: Vec<SheetStat>,
}

impl LoadStats {
    pub fn dropped_rows(&self) -> usize {
        self.sheets.iter().filter(|s| !s.replaced).map(|s| s.dropped).sum()
    }

    pub fn unrecognized(&self) -> Vec<&str> {
        self.sheets
            .iter()
            .filter(|s| s.class == SheetClass::Unrecognized)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// An earlier sheet already landed in `class`, records or not.
    fn seen(&self, class: SheetClass) -> bool {
        self.sheets.iter().any(|s| s.class == class)
    }

    fn mark_replaced(&mut self, class: SheetClass) {
        for stat in self.sheets.iter_mut().filter(|s| s.class == class) {
            stat.replaced = true;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadedLedger {
    pub ledger: Ledger,
    pub forecast: Forecast,
    pub stats: LoadStats,
}

/// Classify, coerce and union in-memory sheets.
pub fn normalize(sheets: &[RawSheet], view: LedgerView) -> LoadedLedger {
    let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
    let mut per_source: BTreeMap<Source, Vec<LedgerRecord>> = BTreeMap::new();
    let mut forecast = Forecast::default();
    let mut stats = LoadStats::default();

    for (sheet, (name, class)) in sheets.iter().zip(classify(&names)) {
        debug!(sheet = %name, class = %class.label(), "classified sheet");
        if class != SheetClass::Unrecognized && stats.seen(class) {
            warn!(sheet = %name, bucket = %class.label(), "sheet replaces an earlier sheet for the same bucket");
            stats.mark_replaced(class);
        }
        let (kept, dropped) = match class {
            SheetClass::Ledger(source) => {
                let out = coerce_ledger(sheet.data_rows(), view.columns(), source);
                let counts = (out.records.len(), out.dropped);
                per_source.insert(source, out.records);
                counts
            }
            SheetClass::Forecast => {
                let out = coerce_forecast(sheet.data_rows(), &FORECAST);
                let counts = (out.records.len(), out.dropped);
                forecast = Forecast::new(out.records);
                counts
            }
            SheetClass::Unrecognized => (0, 0),
        };
        stats.sheets.push(SheetStat {
            name,
            class,
            kept,
            dropped,
            replaced: false,
        });
    }

    let ledger = Ledger::assemble(per_source);
    info!(
        records = ledger.len(),
        forecast = forecast.records().len(),
        dropped = stats.dropped_rows(),
        "normalized workbook"
    );
    LoadedLedger {
        ledger,
        forecast,
        stats,
    }
}

/// Rows of a range, padded so column indices are absolute sheet positions.
fn range_rows(range: &Range<Data>) -> Vec<Vec<Data>> {
    let col_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);
    range
        .rows()
        .map(|row| {
            let mut cells = vec![Data::Empty; col_offset];
            cells.extend_from_slice(row);
            cells
        })
        .collect()
}

/// Read every sheet of a workbook. Sheets that fail to read are skipped.
pub fn read_sheets(path: &Path) -> Result<Vec<RawSheet>> {
    let mut workbook = calamine::open_workbook_auto(path)?;
    let names = workbook.sheet_names();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        match workbook.worksheet_range(&name) {
            Ok(range) => sheets.push(RawSheet::new(name, range_rows(&range))),
            Err(e) => warn!(sheet = %name, error = %e, "skipping unreadable sheet"),
        }
    }
    Ok(sheets)
}

/// Read one named sheet.
pub fn read_sheet(path: &Path, sheet_name: &str) -> Result<RawSheet> {
    let mut workbook = calamine::open_workbook_auto(path)?;
    if !workbook.sheet_names().iter().any(|n| n == sheet_name) {
        return Err(DashError::MissingSheet(sheet_name.to_string()));
    }
    let range = workbook.worksheet_range(sheet_name)?;
    Ok(RawSheet::new(sheet_name, range_rows(&range)))
}

pub fn load_ledger(path: &Path, view: LedgerView) -> Result<LoadedLedger> {
    let sheets = read_sheets(path)?;
    Ok(normalize(&sheets, view))
}
