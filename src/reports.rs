use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use crate::forecast::{daily_payable, Forecast};
use crate::ledger::{daily_totals, split_flow, AmountRole, Ledger};
use crate::models::{Certainty, CreditProfile, Source};
use crate::tracker::{snapshot, Utilization};

// ---------------------------------------------------------------------------
// Bank limits
// ---------------------------------------------------------------------------

pub struct LimitRow {
    pub source: Source,
    pub usage: Utilization,
}

pub fn get_limits(
    ledger: &Ledger,
    as_of: NaiveDate,
    profiles: &BTreeMap<Source, CreditProfile>,
) -> Vec<LimitRow> {
    snapshot(ledger, as_of, profiles)
        .into_iter()
        .map(|(source, usage)| LimitRow { source, usage })
        .collect()
}

// ---------------------------------------------------------------------------
// Daily trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TrendDay {
    pub date: NaiveDate,
    pub deposit: f64,
    pub withdrawal: f64,
    pub net: f64,
}

pub struct TrendReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<TrendDay>,
}

/// Deposits, withdrawals and net flow per day over the `days`-long window
/// ending on `end`.
pub fn get_trend(ledger: &Ledger, end: NaiveDate, days: u32) -> TrendReport {
    let span = u64::from(days.max(1) - 1);
    let start = end.checked_sub_days(Days::new(span)).unwrap_or(NaiveDate::MIN);
    let records = ledger.filter(start, end);

    let mut splits: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for record in records.iter().filter(|r| r.net_flow.is_some()) {
        let split = split_flow(record);
        let entry = splits.entry(record.value_date).or_default();
        entry.0 += split.deposit;
        entry.1 += split.withdrawal;
    }

    let days = daily_totals(&records, AmountRole::NetFlow)
        .into_iter()
        .map(|(date, net)| {
            let (deposit, withdrawal) = splits.get(&date).copied().unwrap_or_default();
            TrendDay {
                date,
                deposit,
                withdrawal,
                net,
            }
        })
        .collect();

    TrendReport { start, end, days }
}

// ---------------------------------------------------------------------------
// Forecast vs actual
// ---------------------------------------------------------------------------

pub struct VarianceReport {
    pub fixed: Vec<(NaiveDate, f64)>,
    pub contingency: Vec<(NaiveDate, f64)>,
    pub actual: Vec<(NaiveDate, f64)>,
}

impl VarianceReport {
    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty() && self.contingency.is_empty() && self.actual.is_empty()
    }

    /// Every date present in any series, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .fixed
            .iter()
            .chain(&self.contingency)
            .chain(&self.actual)
            .map(|(d, _)| *d)
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }
}

pub fn get_variance(
    ledger: &Ledger,
    forecast: &Forecast,
    start: NaiveDate,
    end: NaiveDate,
) -> VarianceReport {
    let planned = forecast.filter(start, end);
    let actuals = ledger.filter(start, end);
    VarianceReport {
        fixed: daily_payable(&planned, &Certainty::Fixed),
        contingency: daily_payable(&planned, &Certainty::Contingency),
        actual: daily_totals(&actuals, AmountRole::NetFlow),
    }
}

// ---------------------------------------------------------------------------
// Transaction register
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterRow {
    pub date: NaiveDate,
    pub source: Source,
    pub category: String,
    pub net_flow: f64,
    pub remarks: String,
}

pub struct RegisterReport {
    pub rows: Vec<RegisterRow>,
    pub total: f64,
}

pub fn get_register(ledger: &Ledger, start: NaiveDate, end: NaiveDate) -> RegisterReport {
    let mut rows: Vec<RegisterRow> = ledger
        .filter(start, end)
        .into_iter()
        .filter_map(|r| {
            Some(RegisterRow {
                date: r.value_date,
                source: r.source,
                category: r.category.clone(),
                net_flow: r.net_flow?,
                remarks: r.remarks.clone(),
            })
        })
        .collect();
    rows.sort_by_key(|r| r.date);
    let total = rows.iter().map(|r| r.net_flow).sum();
    RegisterReport { rows, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::tests::{balance, flow, ymd};
    use crate::models::{ForecastRecord, LedgerRecord, SignConvention};

    fn ledger_of(records: Vec<LedgerRecord>) -> Ledger {
        let mut per_source: BTreeMap<Source, Vec<LedgerRecord>> = BTreeMap::new();
        for r in records {
            per_source.entry(r.source).or_default().push(r);
        }
        Ledger::assemble(per_source)
    }

    #[test]
    fn test_trend_window_is_thirty_days_inclusive() {
        let ledger = ledger_of(vec![
            flow(Source::Sbi, ymd(2024, 1, 1), 999.0),
            flow(Source::Sbi, ymd(2024, 1, 2), -50.0),
            flow(Source::Axis, ymd(2024, 1, 2), 80.0),
            flow(Source::Sbi, ymd(2024, 1, 31), 10.0),
        ]);
        let report = get_trend(&ledger, ymd(2024, 1, 31), 30);
        assert_eq!(report.start, ymd(2024, 1, 2));
        assert_eq!(
            report.days,
            vec![
                TrendDay { date: ymd(2024, 1, 2), deposit: 80.0, withdrawal: 50.0, net: 30.0 },
                TrendDay { date: ymd(2024, 1, 31), deposit: 10.0, withdrawal: 0.0, net: 10.0 },
            ]
        );
    }

    #[test]
    fn test_trend_without_data_is_empty() {
        let report = get_trend(&Ledger::default(), ymd(2024, 1, 31), 30);
        assert!(report.days.is_empty());
    }

    #[test]
    fn test_variance_series() {
        let ledger = ledger_of(vec![
            flow(Source::Hdfc, ymd(2024, 5, 1), -100.0),
            flow(Source::Icici, ymd(2024, 5, 1), 40.0),
        ]);
        let forecast = Forecast::new(vec![
            ForecastRecord {
                forecast_date: ymd(2024, 5, 1),
                net_payable: Some(-90.0),
                certainty: Certainty::Fixed,
            },
            ForecastRecord {
                forecast_date: ymd(2024, 5, 3),
                net_payable: Some(-20.0),
                certainty: Certainty::Contingency,
            },
            ForecastRecord {
                forecast_date: ymd(2024, 6, 3),
                net_payable: Some(-20.0),
                certainty: Certainty::Contingency,
            },
        ]);
        let report = get_variance(&ledger, &forecast, ymd(2024, 5, 1), ymd(2024, 5, 31));
        assert_eq!(report.fixed, vec![(ymd(2024, 5, 1), -90.0)]);
        assert_eq!(report.contingency, vec![(ymd(2024, 5, 3), -20.0)]);
        assert_eq!(report.actual, vec![(ymd(2024, 5, 1), -60.0)]);
        assert_eq!(report.dates(), vec![ymd(2024, 5, 1), ymd(2024, 5, 3)]);
        assert!(get_variance(&Ledger::default(), &Forecast::default(), ymd(2024, 5, 1), ymd(2024, 5, 31)).is_empty());
    }

    #[test]
    fn test_register_sorted_by_date() {
        let ledger = ledger_of(vec![
            flow(Source::Sbi, ymd(2024, 1, 3), 3.0),
            flow(Source::Axis, ymd(2024, 1, 1), 1.0),
            flow(Source::Sbi, ymd(2024, 1, 2), 2.0),
            balance(Source::Yes, ymd(2024, 1, 2), 500.0),
        ]);
        let report = get_register(&ledger, ymd(2024, 1, 1), ymd(2024, 1, 31));
        let dates: Vec<NaiveDate> = report.rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 3)]);
        assert_eq!(report.total, 6.0);
    }

    #[test]
    fn test_limits_follow_profile_order() {
        let ledger = ledger_of(vec![balance(Source::Federal, ymd(2024, 1, 1), 30.0)]);
        let mut profiles = BTreeMap::new();
        profiles.insert(Source::Federal, CreditProfile { limit: 100.0, convention: SignConvention::DrawnPositive });
        profiles.insert(Source::Sbi, CreditProfile { limit: 100.0, convention: SignConvention::PositiveAvailable });
        let rows = get_limits(&ledger, ymd(2024, 1, 1), &profiles);
        assert_eq!(rows[0].source, Source::Sbi);
        assert_eq!(rows[1].source, Source::Federal);
        assert_eq!(rows[1].usage.available, 70.0);
    }
}
