use std::path::Path;

use calamine::Data;
use regex::RegexBuilder;

use crate::coercer::{cell_date, cell_number, cell_text};
use crate::error::Result;
use crate::workbook::{read_sheet, RawSheet};

pub const PL_SHEET: &str = "P&L";

pub const PL_ITEMS: [&str; 8] = [
    "Revenue",
    "Operating expense",
    "Admin & Overheads",
    "Employee Cost",
    "Other cost",
    "EBITDA",
    "Finance Costs",
    "PAT",
];

/// Items drawn as lines; the rest are cost bars.
pub const HEADLINE_ITEMS: [&str; 3] = ["Revenue", "EBITDA", "PAT"];

const COST_ITEMS: [&str; 4] = ["Operating expense", "Admin & Overheads", "Employee Cost", "Other cost"];

const MONTHS_SHOWN: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub name: &'static str,
    pub months: Vec<String>,
    pub values: Vec<f64>,
    pub ytd: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PnlSummary {
    pub items: Vec<LineItem>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratios {
    pub ebitda_margin: f64,
    pub cost_ratio: f64,
    pub net_margin: f64,
}

impl PnlSummary {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, name: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.name == name)
    }

    /// YTD value of an item; absent items count as zero.
    pub fn ytd(&self, name: &str) -> f64 {
        self.item(name).map(|i| i.ytd).unwrap_or(0.0)
    }

    /// Margins against YTD revenue. None unless revenue is positive.
    pub fn ratios(&self) -> Option<Ratios> {
        let revenue = self.ytd("Revenue");
        if revenue <= 0.0 {
            return None;
        }
        let total_costs: f64 = COST_ITEMS.iter().map(|c| self.ytd(c).abs()).sum();
        Some(Ratios {
            ebitda_margin: self.ytd("EBITDA") / revenue * 100.0,
            cost_ratio: total_costs / revenue * 100.0,
            net_margin: self.ytd("PAT") / revenue * 100.0,
        })
    }
}

fn header_text(cell: &Data) -> String {
    let text = match cell {
        Data::DateTime(_) => cell_date(cell)
            .map(|d| d.format("%b-%y").to_string())
            .unwrap_or_default(),
        _ => cell_text(cell).unwrap_or_default(),
    };
    text.trim().to_lowercase()
}

/// "apr-24" -> "Apr 24"
pub fn month_label(header: &str) -> String {
    let mut label = String::with_capacity(header.len());
    let mut prev_alpha = false;
    for c in header.replace('-', " ").chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                label.extend(c.to_lowercase());
            } else {
                label.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            label.push(c);
            prev_alpha = false;
        }
    }
    label
}

/// Extract line items from the P&L sheet. Column 0 holds statement labels;
/// the first non-YTD data column is skipped and the next twelve are months.
pub fn process(sheet: &RawSheet, ytd_fallback: bool) -> PnlSummary {
    let headers: Vec<String> = sheet.header().iter().map(header_text).collect();
    if headers.is_empty() {
        return PnlSummary::default();
    }
    let month_cols: Vec<usize> = (1..headers.len())
        .filter(|&i| !headers[i].contains("ytd"))
        .skip(1)
        .take(MONTHS_SHOWN)
        .collect();
    let ytd_col = headers.iter().position(|h| h.contains("ytd"));
    let months: Vec<String> = month_cols.iter().map(|&i| month_label(&headers[i])).collect();

    let mut items = Vec::new();
    for name in PL_ITEMS {
        let Ok(pattern) = RegexBuilder::new(&regex::escape(name))
            .case_insensitive(true)
            .build()
        else {
            continue;
        };
        let Some(row) = sheet.data_rows().find(|row| {
            row.first()
                .and_then(cell_text)
                .is_some_and(|label| pattern.is_match(&label))
        }) else {
            continue;
        };
        let number_at = |idx: usize| row.get(idx).and_then(cell_number);
        let values: Vec<f64> = month_cols.iter().map(|&i| number_at(i).unwrap_or(0.0)).collect();
        let ytd = match ytd_col {
            Some(col) => number_at(col).unwrap_or(0.0),
            None if ytd_fallback => values.iter().sum(),
            None => 0.0,
        };
        items.push(LineItem {
            name,
            months: months.clone(),
            values,
            ytd,
        });
    }
    PnlSummary { items }
}

pub fn load_pnl(path: &Path, ytd_fallback: bool) -> Result<PnlSummary> {
    let sheet = read_sheet(path, PL_SHEET)?;
    Ok(process(&sheet, ytd_fallback))
}
