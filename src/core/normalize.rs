//! Conversion of free-form client text into comparable numbers.
//!
//! Every function here is total: input that cannot be understood becomes
//! zero, which makes the dependent criterion compare as failing.

/// Parse a credit score such as "650-700", "700+" or "680"
///
/// Ranges yield their lower bound. Unparsable input yields 0.
pub fn parse_credit_score(text: &str) -> i32 {
    let lowered = text.to_lowercase();

    if let Some((lower_bound, _)) = lowered.split_once('-') {
        return lower_bound.trim().parse().unwrap_or(0);
    }

    lowered.replace('+', "").trim().parse().unwrap_or(0)
}

/// Parse time in business into whole months
///
/// Accepts "N years", "N year", "N months", "N month" and bare numbers
/// (taken as months). A "+" suffix such as "2+ years" is ignored. Year
/// counts are truncated toward zero before multiplying, so "2.5 years"
/// is 24 months.
pub fn parse_time_in_business(text: &str) -> i32 {
    let lowered = text.to_lowercase();

    if lowered.contains("year") {
        let years = lowered.replace("years", "").replace("year", "").replace('+', "");
        return parse_truncated(years.trim())
            .map(|years| years.saturating_mul(12))
            .unwrap_or(0);
    }

    if lowered.contains("month") {
        let months = lowered.replace("months", "").replace("month", "").replace('+', "");
        return months.trim().parse().unwrap_or(0);
    }

    parse_truncated(lowered.replace('+', "").trim()).unwrap_or(0)
}

/// Parse a monetary amount such as "$45,000.00"
///
/// Everything except ASCII digits and '.' is discarded before parsing.
pub fn parse_amount(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

#[inline]
fn parse_truncated(text: &str) -> Option<i32> {
    let value: f64 = text.parse().ok()?;
    value.is_finite().then(|| value.trunc() as i32)
}
