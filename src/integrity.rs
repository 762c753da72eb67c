//! Request-integrity scanning.
//!
//! Crafted query strings can make a CMS render pages that should not exist:
//! `?p=1abc`, `?cat=1'`, `?year=2024&monthnum=13`, search modifiers without a
//! search. Those pages still return 200, so they must at least be kept out of
//! indexes. This module inspects the raw query variables and reports the first
//! variable that could not have come from a legitimate link.
//!
//! ## Checks
//!
//! - numeric variables must be plain non-negative integers
//! - list variables must be comma-separated (optionally negative) integers
//! - search modifiers require `s`
//! - date archives must name a real calendar date/time

use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;

const NUMERIC_VARS: &[&str] = &[
    "p",
    "page_id",
    "attachment_id",
    "year",
    "monthnum",
    "day",
    "hour",
    "minute",
    "second",
    "m",
    "w",
    "paged",
    "page",
    "cpage",
];

const LIST_VARS: &[&str] = &["cat", "tag_id", "author"];

const SEARCH_MODIFIERS: &[&str] = &["sentence", "exact"];

/// The first offending query variable and why it was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Exploit {
    pub var: String,
    pub reason: &'static str,
}

impl Exploit {
    fn new(var: &str, reason: &'static str) -> Self {
        Exploit { var: var.to_string(), reason }
    }
}

/// Scan `query` and return the first exploit found, if any.
pub(crate) fn find_exploit(query: &BTreeMap<String, String>) -> Option<Exploit> {
    if query.is_empty() {
        return None;
    }

    for &var in NUMERIC_VARS {
        if let Some(value) = query.get(var) {
            if !regex!(r"^[0-9]+$").is_match(value) {
                return Some(Exploit::new(var, "not a number"));
            }
        }
    }

    for &var in LIST_VARS {
        if let Some(value) = query.get(var) {
            if !regex!(r"^-?[0-9]+(,-?[0-9]+)*$").is_match(value) {
                return Some(Exploit::new(var, "not a list of ids"));
            }
        }
    }

    if !query.contains_key("s") {
        if let Some(&var) = SEARCH_MODIFIERS.iter().find(|var| query.contains_key(**var)) {
            return Some(Exploit::new(var, "search modifier without search"));
        }
    }

    if let Some(m) = query.get("m") {
        if !is_valid_m(m) {
            return Some(Exploit::new("m", "not a date"));
        }
    }

    if !is_valid_ymd(query) {
        return Some(Exploit::new("year", "not a date"));
    }

    None
}

/// `m` is `YYYY[MM[DD[HH[II[SS]]]]]`. It already passed the numeric check.
fn is_valid_m(m: &str) -> bool {
    if !matches!(m.len(), 4 | 6 | 8 | 10 | 12 | 14) {
        return false;
    }

    let part = |range: std::ops::Range<usize>, default: u32| -> u32 {
        m.get(range).and_then(|s| s.parse().ok()).unwrap_or(default)
    };
    let Some(year) = m.get(0..4).and_then(|s| s.parse::<i32>().ok()) else {
        return false;
    };

    NaiveDate::from_ymd_opt(year, part(4..6, 1), part(6..8, 1)).is_some()
        && NaiveTime::from_hms_opt(part(8..10, 0), part(10..12, 0), part(12..14, 0)).is_some()
}

/// `year`, `monthnum` and `day`, when given, must form a real date. Missing
/// parts default to the first month/day; a year is assumed leap-safe (2000)
/// when only month and day are given. A part that is present but does not
/// fit a `u32` is never a date.
fn is_valid_ymd(query: &BTreeMap<String, String>) -> bool {
    let mut parts = [None; 3];
    for (slot, key) in parts.iter_mut().zip(["year", "monthnum", "day"]) {
        if let Some(raw) = query.get(key) {
            match raw.parse::<u32>() {
                Ok(value) => *slot = Some(value),
                Err(_) => return false,
            }
        }
    }

    let [year, month, day] = parts;
    if year.is_none() && month.is_none() && day.is_none() {
        return true;
    }

    let Ok(year) = i32::try_from(year.unwrap_or(2000)) else {
        return false;
    };
    NaiveDate::from_ymd_opt(year, month.unwrap_or(1), day.unwrap_or(1)).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn clean_queries_pass() {
        assert_eq!(find_exploit(&query(&[])), None);
        assert_eq!(find_exploit(&query(&[("p", "42")])), None);
        assert_eq!(find_exploit(&query(&[("cat", "3,-5"), ("paged", "2")])), None);
        assert_eq!(find_exploit(&query(&[("s", "robots"), ("exact", "1")])), None);
        assert_eq!(find_exploit(&query(&[("year", "2024"), ("monthnum", "2"), ("day", "29")])), None);
        assert_eq!(find_exploit(&query(&[("m", "20240229")])), None);
        assert_eq!(find_exploit(&query(&[("m", "20240229235959")])), None);
    }

    #[test]
    fn non_numeric_ids_are_exploits() {
        let found = find_exploit(&query(&[("p", "1abc")])).unwrap();
        assert_eq!(found.var, "p");
        assert_eq!(found.reason, "not a number");

        let found = find_exploit(&query(&[("cat", "1'")])).unwrap();
        assert_eq!(found.var, "cat");

        // Only ASCII digits count; other Unicode digits are rejected.
        for (var, value) in [("p", "١٢"), ("paged", "２"), ("year", "٢٠٢٣"), ("cat", "٣,5")] {
            let found = find_exploit(&query(&[(var, value)])).unwrap();
            assert_eq!(found.var, var, "{var}={value}");
        }
    }

    #[test]
    fn search_modifiers_need_a_search() {
        let found = find_exploit(&query(&[("sentence", "1")])).unwrap();
        assert_eq!(found.reason, "search modifier without search");
    }

    #[test]
    fn impossible_dates_are_exploits() {
        assert!(find_exploit(&query(&[("year", "2023"), ("monthnum", "2"), ("day", "29")])).is_some());
        assert!(find_exploit(&query(&[("monthnum", "13")])).is_some());
        assert!(find_exploit(&query(&[("m", "202313")])).is_some());
        assert!(find_exploit(&query(&[("m", "20240101246000")])).is_some());
        assert!(find_exploit(&query(&[("m", "20241")])).is_some());
        assert!(find_exploit(&query(&[("year", "٢٠٢٣"), ("monthnum", "2"), ("day", "29")])).is_some());
    }

    #[test]
    fn oversized_date_parts_are_exploits() {
        let found = find_exploit(&query(&[("year", "99999999999")])).unwrap();
        assert_eq!(found.reason, "not a date");

        let found = find_exploit(&query(&[("monthnum", "1"), ("day", "99999999999")])).unwrap();
        assert_eq!(found.reason, "not a date");
    }
}
