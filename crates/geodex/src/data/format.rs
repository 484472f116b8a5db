//! Display formatting for country fields
//!
//! Every helper has a defined fallback for absent data.

use crate::data::types::Currency;

/// Placeholder for fields the API did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// Thousands-separated integer: `1234567` -> `"1,234,567"`
pub fn grouped(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Short population label used on cards: `"67.4M"`, `"531K"`, `"842"`
pub fn compact_population(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.0}K", n as f64 / 1_000.0)
    } else {
        grouped(n)
    }
}

/// `"Euro (€), Swiss franc (Fr.)"`, or N/A
pub fn currencies(list: &[Currency]) -> String {
    if list.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    list.iter()
        .map(|c| match c.symbol.as_deref() {
            Some(symbol) if !symbol.is_empty() => format!("{} ({})", c.name, symbol),
            _ => c.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Comma-joined list, or N/A when empty
pub fn joined(list: &[String]) -> String {
    if list.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        list.join(", ")
    }
}

/// Language names, or N/A
pub fn languages(list: &[String]) -> String {
    joined(list)
}

/// Capital cities, or N/A for countries without one
pub fn capitals(capital: Option<&[String]>) -> String {
    joined(capital.unwrap_or_default())
}

/// Area with thousands separators and up to three decimals, or N/A
pub fn area(area: Option<f64>) -> String {
    let Some(value) = area.filter(|v| v.is_finite() && *v >= 0.0) else {
        return NOT_AVAILABLE.to_string();
    };

    let rendered = format!("{:.3}", value);
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let int_value: u64 = int_part.parse().unwrap_or(0);
    let frac = frac_part.trim_end_matches('0');

    if frac.is_empty() {
        format!("{} km²", grouped(int_value))
    } else {
        format!("{}.{} km²", grouped(int_value), frac)
    }
}

/// `"Yes"` / `"No"`, or N/A when unknown
pub fn yes_no(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "Yes",
        Some(false) => "No",
        None => NOT_AVAILABLE,
    }
}
