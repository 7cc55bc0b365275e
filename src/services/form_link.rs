//! Registration form link rewriting
//!
//! Reminders carry a link to the registration form with the target date
//! pre-filled, so nobody files under the wrong day by accident.

use chrono::NaiveDate;
use url::Url;

/// Query parameter that pre-fills the date field in the form.
const PREFILL_DATE_PARAM: &str = "prefill_用餐日期";

/// Query parameter that hides/locks the date field in the form.
const HIDE_DATE_PARAM: &str = "hide_用餐日期";

/// Inject the date-prefill parameter (and, when `lock` is set, the
/// date-lock parameter) into a form URL.
///
/// Scheme, host, path, fragment, and all pre-existing query parameters are
/// preserved; only the prefill/lock parameters are inserted or overwritten.
/// Pure function: an empty or unparseable URL is returned unchanged.
pub fn add_prefill_date(form_url: &str, date: NaiveDate, lock: bool) -> String {
    if form_url.is_empty() {
        return String::new();
    }
    let mut url = match Url::parse(form_url) {
        Ok(url) => url,
        Err(_) => return form_url.to_string(),
    };

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    upsert(&mut pairs, PREFILL_DATE_PARAM, &date.format("%Y-%m-%d").to_string());
    if lock {
        upsert(&mut pairs, HIDE_DATE_PARAM, "1");
    }

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    url.to_string()
}

fn upsert(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    match pairs.iter_mut().find(|(k, _)| k == key) {
        Some(pair) => pair.1 = value.to_string(),
        None => pairs.push((key.to_string(), value.to_string())),
    }
}
