use crate::models::Source;

/// Where a workbook sheet's rows go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetClass {
    Ledger(Source),
    Forecast,
    Unrecognized,
}

impl SheetClass {
    pub fn label(&self) -> String {
        match self {
            Self::Ledger(source) => source.name().to_string(),
            Self::Forecast => "forecast".to_string(),
            Self::Unrecognized => "unrecognized".to_string(),
        }
    }
}

const FORECAST_KEYWORD: &str = "forecast";

const SOURCE_KEYWORDS: &[(&str, Source)] = &[
    ("sbi", Source::Sbi),
    ("icici", Source::Icici),
    ("hdfc", Source::Hdfc),
    ("federal", Source::Federal),
    ("axis", Source::Axis),
    ("yes", Source::Yes),
    ("yes bank", Source::Yes),
];

/// Keywords longest first; equal lengths keep table order.
fn keywords_by_specificity() -> Vec<(&'static str, Source)> {
    let mut keywords = SOURCE_KEYWORDS.to_vec();
    keywords.sort_by_key(|(kw, _)| std::cmp::Reverse(kw.len()));
    keywords
}

pub fn classify_one(sheet_name: &str) -> SheetClass {
    let lower = sheet_name.to_lowercase();
    if lower.contains(FORECAST_KEYWORD) {
        return SheetClass::Forecast;
    }
    keywords_by_specificity()
        .into_iter()
        .find(|(kw, _)| lower.contains(kw))
        .map(|(_, source)| SheetClass::Ledger(source))
        .unwrap_or(SheetClass::Unrecognized)
}

/// Classify every sheet, preserving workbook order.
pub fn classify<S: AsRef<str>>(sheet_names: &[S]) -> Vec<(String, SheetClass)> {
    sheet_names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            (name.to_string(), classify_one(name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_takes_precedence() {
        assert_eq!(classify_one("Forecast"), SheetClass::Forecast);
        assert_eq!(classify_one("HDFC forecast Q3"), SheetClass::Forecast);
        assert_eq!(classify_one("sbi-FORECAST"), SheetClass::Forecast);
    }

    #[test]
    fn test_source_keywords_case_insensitive() {
        assert_eq!(classify_one("SBI CC"), SheetClass::Ledger(Source::Sbi));
        assert_eq!(classify_one("Icici OD a/c"), SheetClass::Ledger(Source::Icici));
        assert_eq!(classify_one("federal"), SheetClass::Ledger(Source::Federal));
        assert_eq!(classify_one("AXIS 2024"), SheetClass::Ledger(Source::Axis));
        assert_eq!(classify_one("Yes Bank"), SheetClass::Ledger(Source::Yes));
    }

    #[test]
    fn test_unmatched_sheet_is_unrecognized() {
        assert_eq!(classify_one("Summary"), SheetClass::Unrecognized);
        assert_eq!(classify_one(""), SheetClass::Unrecognized);
    }

    #[test]
    fn test_longest_keyword_wins() {
        let keywords = keywords_by_specificity();
        assert_eq!(keywords[0].0, "yes bank");
        // Equal-length keywords keep table order.
        let four: Vec<&str> = keywords.iter().filter(|(k, _)| k.len() == 4).map(|(k, _)| *k).collect();
        assert_eq!(four, vec!["hdfc", "axis"]);
    }

    #[test]
    fn test_classify_preserves_order() {
        let result = classify(&["Summary", "HDFC", "Forecast", "Axis"]);
        let classes: Vec<SheetClass> = result.iter().map(|(_, c)| *c).collect();
        assert_eq!(
            classes,
            vec![
                SheetClass::Unrecognized,
                SheetClass::Ledger(Source::Hdfc),
                SheetClass::Forecast,
                SheetClass::Ledger(Source::Axis),
            ]
        );
        assert_eq!(result[0].0, "Summary");
    }
}
