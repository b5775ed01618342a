// Utility helpers for parsing and basic statistics.
//
// This module centralizes the CSV/number/date handling so the rest of the
// code can assume clean, typed values.
use crate::types::MISSING_LABEL;
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use std::cmp::Ordering;

/// Order dates are always day/month/year in the sales export.
pub const ORDER_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a string-like value into `f64`.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    // `inf` and `NaN` parse, so the finite check does the rejecting
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_u32_safe(s: Option<&str>) -> Option<u32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', "").parse::<u32>().ok()
}

pub fn parse_order_date(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, ORDER_DATE_FORMAT).ok()
}

/// Trimmed category value, or the missing-group label when empty.
pub fn category(s: Option<String>) -> String {
    match s.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => MISSING_LABEL.to_string(),
    }
}

/// Calendar month key, e.g. `2019-01`. Sorts chronologically as a string.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn average(v: &[f64]) -> f64 {
    // Returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

fn sorted(mut v: Vec<f64>) -> Vec<f64> {
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    v
}

pub fn median(v: Vec<f64>) -> f64 {
    quantile(v, 0.5)
}

/// Quantile with linear interpolation between closest ranks.
pub fn quantile(v: Vec<f64>, q: f64) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    let v = sorted(v);
    let pos = q.clamp(0.0, 1.0) * (v.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    v[lo] + (v[hi] - v[lo]) * frac
}

/// Ordinary least squares fit of `y = slope * x + intercept`.
///
/// Returns `None` unless there are at least two distinct x values.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    let (first_x, _) = *points.first()?;
    if !points.iter().any(|(x, _)| *x != first_x) {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
    let (mut sxx, mut sxy) = (0.0, 0.0);
    for (x, y) in points {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    if !slope.is_finite() || !intercept.is_finite() {
        return None;
    }
    Some((slope, intercept))
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus locale-aware thousands separators (`1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // past u64::MAX the digits are printed without separators
    let mut res = match int_part.parse::<u64>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let (Some(frac), true) = (frac_part, decimals > 0) {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Used for counts in console messages (e.g., `2,747 rows loaded`).
    n.to_formatted_string(&Locale::en)
}
