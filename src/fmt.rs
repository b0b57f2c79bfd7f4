/// Scale an amount to the display unit with two decimals: 12345678 -> "1.23".
pub fn in_unit(val: f64, unit: f64) -> String {
    let scaled = if unit > 0.0 { val / unit } else { val };
    group_thousands(&format!("{:.2}", scaled))
}

/// Column-header suffix for a display unit: "Cr", "L" or "" for raw amounts.
pub fn unit_label(unit: f64) -> String {
    match unit {
        u if u == 10_000_000.0 => "Cr".to_string(),
        u if u == 100_000.0 => "L".to_string(),
        u if u == 1.0 || u <= 0.0 => String::new(),
        u => format!("/{u}"),
    }
}

/// "Used" -> "Used (Cr)"
pub fn header(name: &str, unit: f64) -> String {
    let label = unit_label(unit);
    if label.is_empty() {
        name.to_string()
    } else {
        format!("{name} ({label})")
    }
}

pub fn pct(val: f64) -> String {
    format!("{val:.2}%")
}

fn group_thousands(fixed: &str) -> String {
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (int_part, dec_part) = digits.split_once('.').unwrap_or((digits, ""));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    // "-0.00" reads oddly in a table
    let sign = if with_commas.chars().all(|c| c == '0' || c == ',') && dec_part.chars().all(|c| c == '0') {
        ""
    } else {
        sign
    };
    if dec_part.is_empty() {
        format!("{sign}{with_commas}")
    } else {
        format!("{sign}{with_commas}.{dec_part}")
    }
}
