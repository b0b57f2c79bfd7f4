use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{LedgerRecord, Source};

/// Returned by [`Ledger::balance_as_of`] when a source has no observation yet.
pub const ZERO_BALANCE: f64 = 0.0;

/// Which amount [`daily_totals`] sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountRole {
    NetFlow,
    #[allow(dead_code)]
    RunningBalance,
}

impl AmountRole {
    fn value(&self, record: &LedgerRecord) -> Option<f64> {
        match self {
            Self::NetFlow => record.net_flow,
            Self::RunningBalance => record.running_balance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowSplit {
    pub withdrawal: f64,
    pub deposit: f64,
}

/// Union of every recognized source's records. Immutable once assembled.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    records: Vec<LedgerRecord>,
}

impl Ledger {
    /// Records are grouped by source in source order; each source keeps its
    /// own input order.
    pub fn assemble(per_source: BTreeMap<Source, Vec<LedgerRecord>>) -> Self {
        let records = per_source
            .into_iter()
            .flat_map(|(source, records)| {
                records.into_iter().map(move |mut r| {
                    r.source = source;
                    r
                })
            })
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[LedgerRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Sources that contributed at least one record, in source order.
    pub fn sources(&self) -> Vec<Source> {
        let mut sources: Vec<Source> = self.records.iter().map(|r| r.source).collect();
        sources.dedup();
        sources
    }

    /// Earliest and latest value dates across all sources.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.value_date).min()?;
        let max = self.records.iter().map(|r| r.value_date).max()?;
        Some((min, max))
    }

    /// Records with `start <= value_date <= end`, all sources combined.
    pub fn filter(&self, start: NaiveDate, end: NaiveDate) -> Vec<&LedgerRecord> {
        self.records
            .iter()
            .filter(|r| r.value_date >= start && r.value_date <= end)
            .collect()
    }

    /// Last known running balance of `source` on or before `date`.
    /// Equal dates resolve to the record that appears last.
    pub fn balance_as_of(&self, source: Source, date: NaiveDate) -> f64 {
        self.records
            .iter()
            .filter(|r| r.source == source && r.value_date <= date)
            .fold(None::<&LedgerRecord>, |latest, r| match latest {
                Some(l) if l.value_date > r.value_date => Some(l),
                _ => Some(r),
            })
            .and_then(|r| r.running_balance)
            .unwrap_or(ZERO_BALANCE)
    }
}

/// Per-day sums of `role`, ascending by date. Records without a value for
/// `role` are skipped.
pub fn daily_totals(records: &[&LedgerRecord], role: AmountRole) -> Vec<(NaiveDate, f64)> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        if let Some(value) = role.value(record) {
            *by_day.entry(record.value_date).or_default() += value;
        }
    }
    by_day.into_iter().collect()
}

pub fn split_flow(record: &LedgerRecord) -> FlowSplit {
    split_amount(record.net_flow.unwrap_or(0.0))
}

pub fn split_amount(net_flow: f64) -> FlowSplit {
    if net_flow < 0.0 {
        FlowSplit {
            withdrawal: net_flow.abs(),
            deposit: 0.0,
        }
    } else {
        FlowSplit {
            withdrawal: 0.0,
            deposit: net_flow,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub(crate) fn balance(source: Source, date: NaiveDate, bal: f64) -> LedgerRecord {
        LedgerRecord {
            value_date: date,
            net_flow: None,
            running_balance: Some(bal),
            category: "Unknown".to_string(),
            remarks: String::new(),
            source,
        }
    }

    pub(crate) fn flow(source: Source, date: NaiveDate, amount: f64) -> LedgerRecord {
        LedgerRecord {
            value_date: date,
            net_flow: Some(amount),
            running_balance: None,
            category: "Unknown".to_string(),
            remarks: String::new(),
            source,
        }
    }

    fn ledger_of(records: Vec<LedgerRecord>) -> Ledger {
        let mut per_source: BTreeMap<Source, Vec<LedgerRecord>> = BTreeMap::new();
        for r in records {
            per_source.entry(r.source).or_default().push(r);
        }
        Ledger::assemble(per_source)
    }

    #[test]
    fn test_last_known_value() {
        let ledger = ledger_of(vec![
            balance(Source::Sbi, ymd(2024, 1, 1), 100.0),
            balance(Source::Sbi, ymd(2024, 1, 5), 200.0),
            balance(Source::Sbi, ymd(2024, 1, 9), 300.0),
        ]);
        assert_eq!(ledger.balance_as_of(Source::Sbi, ymd(2023, 12, 31)), ZERO_BALANCE);
        assert_eq!(ledger.balance_as_of(Source::Sbi, ymd(2024, 1, 1)), 100.0);
        assert_eq!(ledger.balance_as_of(Source::Sbi, ymd(2024, 1, 5)), 200.0);
        assert_eq!(ledger.balance_as_of(Source::Sbi, ymd(2024, 1, 8)), 200.0);
        assert_eq!(ledger.balance_as_of(Source::Sbi, ymd(2030, 1, 1)), 300.0);
        assert_eq!(ledger.balance_as_of(Source::Axis, ymd(2030, 1, 1)), ZERO_BALANCE);
    }

    #[test]
    fn test_balance_uses_chronology_not_row_order() {
        let ledger = ledger_of(vec![
            balance(Source::Hdfc, ymd(2024, 1, 9), 900.0),
            balance(Source::Hdfc, ymd(2024, 1, 1), 100.0),
            balance(Source::Hdfc, ymd(2024, 1, 5), 500.0),
            balance(Source::Hdfc, ymd(2024, 1, 5), 550.0),
        ]);
        assert_eq!(ledger.balance_as_of(Source::Hdfc, ymd(2024, 1, 6)), 550.0);
        assert_eq!(ledger.balance_as_of(Source::Hdfc, ymd(2024, 1, 2)), 100.0);
    }

    #[test]
    fn test_filter_is_inclusive_and_stable_within_source() {
        let ledger = ledger_of(vec![
            flow(Source::Icici, ymd(2024, 1, 3), 3.0),
            flow(Source::Sbi, ymd(2024, 1, 1), 1.0),
            flow(Source::Icici, ymd(2024, 1, 1), 4.0),
            flow(Source::Sbi, ymd(2024, 1, 10), 10.0),
        ]);
        let hits = ledger.filter(ymd(2024, 1, 1), ymd(2024, 1, 3));
        assert_eq!(hits.len(), 3);
        let icici: Vec<f64> = hits
            .iter()
            .filter(|r| r.source == Source::Icici)
            .filter_map(|r| r.net_flow)
            .collect();
        assert_eq!(icici, vec![3.0, 4.0]);
        assert!(ledger.filter(ymd(2025, 1, 1), ymd(2025, 12, 31)).is_empty());
    }

    #[test]
    fn test_daily_totals_groups_and_sorts() {
        let ledger = ledger_of(vec![
            flow(Source::Sbi, ymd(2024, 1, 2), 10.0),
            flow(Source::Axis, ymd(2024, 1, 1), -5.0),
            flow(Source::Sbi, ymd(2024, 1, 1), 7.0),
            balance(Source::Yes, ymd(2024, 1, 1), 1000.0),
        ]);
        let all = ledger.filter(ymd(2024, 1, 1), ymd(2024, 1, 31));
        let totals = daily_totals(&all, AmountRole::NetFlow);
        assert_eq!(totals, vec![(ymd(2024, 1, 1), 2.0), (ymd(2024, 1, 2), 10.0)]);
        let balances = daily_totals(&all, AmountRole::RunningBalance);
        assert_eq!(balances, vec![(ymd(2024, 1, 1), 1000.0)]);
        assert!(daily_totals(&[], AmountRole::NetFlow).is_empty());
    }

    #[test]
    fn test_split_flow() {
        assert_eq!(split_amount(-50.0), FlowSplit { withdrawal: 50.0, deposit: 0.0 });
        assert_eq!(split_amount(50.0), FlowSplit { withdrawal: 0.0, deposit: 50.0 });
        assert_eq!(split_amount(0.0), FlowSplit::default());
    }

    #[test]
    fn test_split_magnitudes_sum_to_absolute_flow() {
        let records = vec![
            flow(Source::Sbi, ymd(2024, 1, 1), -50.0),
            flow(Source::Sbi, ymd(2024, 1, 1), 20.0),
            flow(Source::Axis, ymd(2024, 1, 2), 0.0),
            flow(Source::Axis, ymd(2024, 1, 3), -7.5),
        ];
        let magnitudes: f64 = records
            .iter()
            .map(split_flow)
            .map(|s| s.withdrawal + s.deposit)
            .sum();
        let absolute: f64 = records.iter().filter_map(|r| r.net_flow).map(f64::abs).sum();
        assert_eq!(magnitudes, absolute);
    }

    #[test]
    fn test_sources_and_span() {
        let ledger = ledger_of(vec![
            flow(Source::Yes, ymd(2024, 3, 1), 1.0),
            flow(Source::Sbi, ymd(2024, 1, 1), 1.0),
            flow(Source::Sbi, ymd(2024, 2, 1), 1.0),
        ]);
        assert_eq!(ledger.sources(), vec![Source::Sbi, Source::Yes]);
        assert_eq!(ledger.date_span(), Some((ymd(2024, 1, 1), ymd(2024, 3, 1))));
        assert_eq!(Ledger::default().date_span(), None);
    }
}
