use calamine::Data;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

use crate::models::{Certainty, ForecastRecord, LedgerRecord, Source};

// ---------------------------------------------------------------------------
// Column roles and per-view layouts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    ValueDate,
    RunningBalance,
    NetFlow,
    Category,
    Remarks,
    ForecastDate,
    NetPayable,
    Certainty,
}

/// Named column positions for one sheet kind, plus the roles a row must have.
#[derive(Debug)]
pub struct ColumnMap {
    columns: &'static [(Role, usize)],
    required: &'static [Role],
}

impl ColumnMap {
    pub const fn new(columns: &'static [(Role, usize)], required: &'static [Role]) -> Self {
        Self { columns, required }
    }

    pub fn column(&self, role: Role) -> Option<usize> {
        self.columns.iter().find(|(r, _)| *r == role).map(|(_, idx)| *idx)
    }

    pub fn is_required(&self, role: Role) -> bool {
        self.required.contains(&role)
    }

    fn cell<'a>(&self, row: &'a [Data], role: Role) -> Option<&'a Data> {
        self.column(role).and_then(|idx| row.get(idx))
    }
}

pub const LEDGER_BALANCE: ColumnMap = ColumnMap::new(
    &[(Role::ValueDate, 2), (Role::RunningBalance, 9)],
    &[Role::ValueDate, Role::RunningBalance],
);

pub const LEDGER_FLOW: ColumnMap = ColumnMap::new(
    &[(Role::ValueDate, 2), (Role::NetFlow, 8)],
    &[Role::ValueDate, Role::NetFlow],
);

pub const LEDGER_DETAIL: ColumnMap = ColumnMap::new(
    &[
        (Role::ValueDate, 2),
        (Role::NetFlow, 8),
        (Role::Category, 11),
        (Role::Remarks, 12),
    ],
    &[Role::ValueDate, Role::NetFlow],
);

pub const FORECAST: ColumnMap = ColumnMap::new(
    &[
        (Role::ForecastDate, 2),
        (Role::NetPayable, 6),
        (Role::Certainty, 15),
    ],
    &[Role::ForecastDate],
);

/// Which ledger columns a page needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerView {
    Balance,
    Flow,
    Detail,
}

impl LedgerView {
    pub fn columns(&self) -> &'static ColumnMap {
        match self {
            Self::Balance => &LEDGER_BALANCE,
            Self::Flow => &LEDGER_FLOW,
            Self::Detail => &LEDGER_DETAIL,
        }
    }
}

// ---------------------------------------------------------------------------
// Cell helpers
// ---------------------------------------------------------------------------

// Month-first before day-first for ambiguous slashed dates, with or
// without a time part.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m/%d/%y",
    "%d/%m/%y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d-%b-%y",
    "%b %d, %Y",
    "%d %B %Y",
    "%B %d, %Y",
];

/// Excel serial day to calendar date; the time fraction is discarded.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    // 2958465 is 9999-12-31
    if !serial.is_finite() || !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_days(Days::new(serial.trunc() as u64))
}

/// `%Y` accepts any digit count, so "1/5/24" would otherwise read as year 1.
const YEAR_WINDOW: std::ops::RangeInclusive<i32> = 1900..=9999;

fn in_year_window(date: &NaiveDate) -> bool {
    YEAR_WINDOW.contains(&date.year())
}

/// First format that yields a date inside the year window wins; two-digit
/// years fall through to the `%y` formats.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .find(in_year_window)
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .find(in_year_window)
        })
}

/// Lenient amount parsing: thousands separators, currency symbols and
/// accounting-style parentheses are accepted. Anything else is absent.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '"' | '$' | '\u{20b9}'))
        .collect();
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let value = if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        -inner.trim().parse::<f64>().ok()?
    } else {
        s.parse::<f64>().ok()?
    };
    value.is_finite().then_some(value)
}

pub fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64()),
        Data::Float(f) => excel_serial_to_date(*f),
        Data::Int(i) => excel_serial_to_date(*i as f64),
        Data::String(s) | Data::DateTimeIso(s) => parse_date(s),
        _ => None,
    }
}

pub fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => f.is_finite().then_some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => parse_amount(s),
        _ => None,
    }
}

pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(_) => cell_date(cell).map(|d| d.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Row coercion
// ---------------------------------------------------------------------------

pub const DEFAULT_CATEGORY: &str = "Unknown";

#[derive(Debug)]
pub struct Coerced<T> {
    pub records: Vec<T>,
    pub dropped: usize,
}

impl<T> Default for Coerced<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            dropped: 0,
        }
    }
}

/// Coerce data rows (header already skipped) from a bank sheet.
/// Rows missing a required role are dropped and counted, never emitted.
pub fn coerce_ledger<'a, I>(rows: I, map: &ColumnMap, source: Source) -> Coerced<LedgerRecord>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut out = Coerced::default();
    for row in rows {
        let value_date = map.cell(row, Role::ValueDate).and_then(cell_date);
        let net_flow = map.cell(row, Role::NetFlow).and_then(cell_number);
        let running_balance = map.cell(row, Role::RunningBalance).and_then(cell_number);
        let category = map.cell(row, Role::Category).and_then(cell_text);
        let remarks = map.cell(row, Role::Remarks).and_then(cell_text);

        let missing_required = (map.is_required(Role::NetFlow) && net_flow.is_none())
            || (map.is_required(Role::RunningBalance) && running_balance.is_none())
            || (map.is_required(Role::Category) && category.is_none())
            || (map.is_required(Role::Remarks) && remarks.is_none());
        let Some(value_date) = value_date.filter(|_| !missing_required) else {
            out.dropped += 1;
            continue;
        };

        out.records.push(LedgerRecord {
            value_date,
            net_flow,
            running_balance,
            category: category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            remarks: remarks.unwrap_or_default(),
            source,
        });
    }
    out
}

/// Coerce data rows (header already skipped) from a forecast sheet.
pub fn coerce_forecast<'a, I>(rows: I, map: &ColumnMap) -> Coerced<ForecastRecord>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut out = Coerced::default();
    for row in rows {
        let forecast_date = map.cell(row, Role::ForecastDate).and_then(cell_date);
        let net_payable = map.cell(row, Role::NetPayable).and_then(cell_number);
        let certainty = map.cell(row, Role::Certainty).and_then(cell_text);

        let missing_required = (map.is_required(Role::NetPayable) && net_payable.is_none())
            || (map.is_required(Role::Certainty) && certainty.is_none());
        let Some(forecast_date) = forecast_date.filter(|_| !missing_required) else {
            out.dropped += 1;
            continue;
        };

        out.records.push(ForecastRecord {
            forecast_date,
            net_payable,
            certainty: Certainty::from_label(certainty.as_deref()),
        });
    }
    out
}
