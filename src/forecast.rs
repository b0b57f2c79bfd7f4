use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{Certainty, ForecastRecord};

/// Forecast line items from the workbook's forecast sheet.
#[derive(Debug, Clone, Default)]
pub struct Forecast {
    records: Vec<ForecastRecord>,
}

impl Forecast {
    pub fn new(records: Vec<ForecastRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filter(&self, start: NaiveDate, end: NaiveDate) -> Vec<&ForecastRecord> {
        self.records
            .iter()
            .filter(|r| r.forecast_date >= start && r.forecast_date <= end)
            .collect()
    }
}

/// Per-day payable for one certainty bucket, ascending. Items without a
/// payable amount are left out rather than counted as zero.
pub fn daily_payable(records: &[&ForecastRecord], certainty: &Certainty) -> Vec<(NaiveDate, f64)> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records.iter().filter(|r| &r.certainty == certainty) {
        if let Some(amount) = record.net_payable {
            *by_day.entry(record.forecast_date).or_default() += amount;
        }
    }
    by_day.into_iter().collect()
}
