use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A bank ledger feed. Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "SBI")]
    Sbi,
    #[serde(rename = "ICICI")]
    Icici,
    #[serde(rename = "HDFC")]
    Hdfc,
    Federal,
    Axis,
    Yes,
}

impl Source {
    pub const ALL: [Source; 6] = [
        Source::Sbi,
        Source::Icici,
        Source::Hdfc,
        Source::Federal,
        Source::Axis,
        Source::Yes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sbi => "SBI",
            Self::Icici => "ICICI",
            Self::Hdfc => "HDFC",
            Self::Federal => "Federal",
            Self::Axis => "Axis",
            Self::Yes => "Yes",
        }
    }

    pub fn default_limit(&self) -> f64 {
        match self {
            Self::Sbi => 69_000_000.0,
            Self::Icici => 100_000_000.0,
            Self::Hdfc => 100_000_000.0,
            Self::Federal => 150_000_000.0,
            Self::Axis => 5_000_000.0,
            Self::Yes => 50_000_000.0,
        }
    }

    pub fn default_convention(&self) -> SignConvention {
        match self {
            Self::Federal | Self::Axis => SignConvention::DrawnPositive,
            _ => SignConvention::PositiveAvailable,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a source reports its running balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignConvention {
    /// Positive balance is money on hand; overdraft shows as negative.
    PositiveAvailable,
    /// Positive balance is the amount drawn against the limit.
    DrawnPositive,
}

impl SignConvention {
    pub fn key(&self) -> &'static str {
        match self {
            Self::PositiveAvailable => "positive-available",
            Self::DrawnPositive => "drawn-positive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreditProfile {
    pub limit: f64,
    pub convention: SignConvention,
}

/// One normalized row from a bank sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRecord {
    pub value_date: NaiveDate,
    pub net_flow: Option<f64>,
    pub running_balance: Option<f64>,
    pub category: String,
    pub remarks: String,
    pub source: Source,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Certainty {
    Fixed,
    Contingency,
    Unknown,
    /// Any other label, lowercased.
    Other(String),
}

impl Certainty {
    pub fn from_label(raw: Option<&str>) -> Self {
        let Some(label) = raw.map(|s| s.trim().to_lowercase()) else {
            return Self::Unknown;
        };
        match label.as_str() {
            "" | "unknown" => Self::Unknown,
            "fixed" => Self::Fixed,
            "contingency" => Self::Contingency,
            _ => Self::Other(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRecord {
    pub forecast_date: NaiveDate,
    pub net_payable: Option<f64>,
    pub certainty: Certainty,
}
