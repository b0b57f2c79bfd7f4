use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::ledger::Ledger;
use crate::models::{CreditProfile, SignConvention, Source};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Utilization {
    pub limit: f64,
    pub used: f64,
    pub available: f64,
    pub utilization_pct: f64,
}

impl Utilization {
    pub fn from_balance(balance: f64, profile: &CreditProfile) -> Self {
        let limit = profile.limit;
        let (used, available) = match profile.convention {
            SignConvention::PositiveAvailable => (-balance, limit + balance),
            SignConvention::DrawnPositive => (balance, limit - balance),
        };
        let utilization_pct = if limit > 0.0 {
            used.abs() / limit * 100.0
        } else {
            0.0
        };
        Self {
            limit,
            used,
            available,
            utilization_pct,
        }
    }
}

/// Limit usage per configured source as of `as_of`. Sources are independent;
/// there is no combined total.
pub fn snapshot(
    ledger: &Ledger,
    as_of: NaiveDate,
    profiles: &BTreeMap<Source, CreditProfile>,
) -> BTreeMap<Source, Utilization> {
    profiles
        .iter()
        .map(|(source, profile)| {
            let balance = ledger.balance_as_of(*source, as_of);
            (*source, Utilization::from_balance(balance, profile))
        })
        .collect()
}
