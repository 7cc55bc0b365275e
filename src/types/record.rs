//! Registration record types

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;

/// Bitable column holding the registration (base) date.
/// Must stay in sync with the serde rename on [`RecordFields::date`];
/// also used to build the server-side listing filter.
pub const DATE_FIELD: &str = "用餐日期";

/// Canonical meal kinds. Closed set: unrecognized selections are dropped
/// during normalization, never surfaced as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealKind {
    Lunch,
    Dinner,
    /// Registered the evening before, served the following morning.
    BreakfastNext,
}

impl MealKind {
    /// Parse a configuration value ("lunch" / "dinner" / "breakfast_next").
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lunch" => Some(MealKind::Lunch),
            "dinner" => Some(MealKind::Dinner),
            "breakfast_next" => Some(MealKind::BreakfastNext),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MealKind::Lunch => "lunch",
            MealKind::Dinner => "dinner",
            MealKind::BreakfastNext => "breakfast_next",
        }
    }

    /// Display name used in outbound messages.
    pub fn display_cn(&self) -> &'static str {
        match self {
            MealKind::Lunch => "午餐",
            MealKind::Dinner => "晚餐",
            MealKind::BreakfastNext => "早餐",
        }
    }

    /// The calendar day a registration filed under `base_date` is served on.
    /// Lunch and dinner are served the same day; next-day breakfast the
    /// morning after. `None` only at the edge of the calendar range.
    pub fn served_on(&self, base_date: NaiveDate) -> Option<NaiveDate> {
        match self {
            MealKind::Lunch | MealKind::Dinner => Some(base_date),
            MealKind::BreakfastNext => base_date.succ_opt(),
        }
    }

    /// Inverse of [`served_on`](Self::served_on): the base date registrations
    /// for `served_date` were filed under.
    pub fn base_for(&self, served_date: NaiveDate) -> Option<NaiveDate> {
        match self {
            MealKind::Lunch | MealKind::Dinner => Some(served_date),
            MealKind::BreakfastNext => served_date.pred_opt(),
        }
    }
}

/// Raw meal-selection field value. The table column is duck-typed at the
/// wire level: a multi-select yields a list, older rows a comma-joined
/// string, and anything else carries no selection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MealSelection {
    Tags(Vec<String>),
    Joined(String),
    Other(serde_json::Value),
}

/// Raw quantity field value (integer-like, but not guaranteed to be one).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

/// Typed view of one Bitable row. Every field is optional at the wire
/// level; missing identity fields drop the record during indexing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordFields {
    /// Registration (base) date, `YYYY-MM-DD`
    #[serde(rename = "用餐日期", default)]
    pub date: Option<String>,
    #[serde(rename = "姓名", default)]
    pub name: Option<String>,
    #[serde(rename = "餐别", default)]
    pub meals: Option<MealSelection>,
    #[serde(rename = "成人份数", default)]
    pub adults: Option<Quantity>,
    #[serde(rename = "儿童份数", default)]
    pub children: Option<Quantity>,
}

/// One row fetched from the Bitable table. Created and mutated externally
/// through the registration form; read-only here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub fields: RecordFields,
    #[serde(default)]
    pub last_modified_time: Option<i64>,
    #[serde(default)]
    pub updated_time: Option<i64>,
    #[serde(default)]
    pub created_time: Option<i64>,
}

impl RawRecord {
    /// Dedup tie-break timestamp: last-modified, else updated, else created,
    /// else 0. Not guaranteed unique across records.
    pub fn modified_at(&self) -> i64 {
        self.last_modified_time
            .or(self.updated_time)
            .or(self.created_time)
            .unwrap_or(0)
    }
}

/// One registration expanded to a single meal kind. A raw record selecting
/// N kinds becomes N entries sharing quantities and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    pub base_date: NaiveDate,
    pub name: String,
    pub meal: MealKind,
    pub adults: u32,
    pub children: u32,
    pub modified_at: i64,
}

/// The "latest wins" slot identifier: (base date, person, meal kind).
pub type DedupKey = (NaiveDate, String, MealKind);

/// Deduplicated entry set, at most one entry per [`DedupKey`].
pub type EntryIndex = HashMap<DedupKey, NormalizedEntry>;

/// Per-meal adult/child totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Headcount {
    pub adults: u32,
    pub children: u32,
}

impl Headcount {
    pub fn total(&self) -> u32 {
        self.adults + self.children
    }
}

/// Clipping maxima for the two quantity fields, independently configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityLimits {
    pub adult_max: u32,
    pub child_max: u32,
}

impl Default for QuantityLimits {
    fn default() -> Self {
        Self {
            adult_max: 2,
            child_max: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    // ========== MealKind ==========

    #[test]
    fn test_meal_kind_parse() {
        assert_eq!(MealKind::parse("lunch"), Some(MealKind::Lunch));
        assert_eq!(MealKind::parse("dinner"), Some(MealKind::Dinner));
        assert_eq!(
            MealKind::parse("breakfast_next"),
            Some(MealKind::BreakfastNext)
        );
        assert_eq!(MealKind::parse("brunch"), None);
        assert_eq!(MealKind::parse(""), None);
    }

    #[test]
    fn test_served_on_same_day_for_lunch_and_dinner() {
        let base = date("2024-01-09");
        assert_eq!(MealKind::Lunch.served_on(base), Some(base));
        assert_eq!(MealKind::Dinner.served_on(base), Some(base));
    }

    #[test]
    fn test_served_on_next_day_for_breakfast() {
        assert_eq!(
            MealKind::BreakfastNext.served_on(date("2024-01-09")),
            Some(date("2024-01-10"))
        );
    }

    #[test]
    fn test_base_for_inverts_served_on() {
        let served = date("2024-01-10");
        for kind in [MealKind::Lunch, MealKind::Dinner, MealKind::BreakfastNext] {
            let base = kind.base_for(served).unwrap();
            assert_eq!(kind.served_on(base), Some(served));
        }
    }

    // ========== RawRecord timestamps ==========

    #[test]
    fn test_modified_at_prefers_last_modified() {
        let record = RawRecord {
            last_modified_time: Some(300),
            updated_time: Some(200),
            created_time: Some(100),
            ..Default::default()
        };
        assert_eq!(record.modified_at(), 300);
    }

    #[test]
    fn test_modified_at_falls_back_to_updated_then_created() {
        let record = RawRecord {
            updated_time: Some(200),
            created_time: Some(100),
            ..Default::default()
        };
        assert_eq!(record.modified_at(), 200);

        let record = RawRecord {
            created_time: Some(100),
            ..Default::default()
        };
        assert_eq!(record.modified_at(), 100);
    }

    #[test]
    fn test_modified_at_defaults_to_zero() {
        assert_eq!(RawRecord::default().modified_at(), 0);
    }

    // ========== Wire deserialization ==========

    #[test]
    fn test_record_fields_deserialize_multi_select() {
        let record: RawRecord = serde_json::from_str(
            r#"{
                "fields": {
                    "用餐日期": "2024-01-09",
                    "姓名": "张三",
                    "餐别": ["午餐", "晚餐"],
                    "成人份数": 2,
                    "儿童份数": 1
                },
                "last_modified_time": 1704790000000
            }"#,
        )
        .unwrap();

        assert_eq!(record.fields.date.as_deref(), Some("2024-01-09"));
        assert_eq!(record.fields.name.as_deref(), Some("张三"));
        assert_eq!(
            record.fields.meals,
            Some(MealSelection::Tags(vec!["午餐".into(), "晚餐".into()]))
        );
        assert_eq!(record.fields.adults, Some(Quantity::Int(2)));
        assert_eq!(record.modified_at(), 1704790000000);
    }

    #[test]
    fn test_record_fields_deserialize_joined_string_and_text_quantity() {
        let record: RawRecord = serde_json::from_str(
            r#"{
                "fields": {
                    "用餐日期": "2024-01-09",
                    "姓名": "A",
                    "餐别": "午餐，晚餐",
                    "成人份数": "1"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            record.fields.meals,
            Some(MealSelection::Joined("午餐，晚餐".into()))
        );
        assert_eq!(record.fields.adults, Some(Quantity::Text("1".into())));
        assert_eq!(record.fields.children, None);
    }

    #[test]
    fn test_record_fields_tolerate_unexpected_shapes() {
        // A number where a selection belongs, an object where a quantity
        // belongs: both land in the Other arm instead of failing the fetch.
        let record: RawRecord = serde_json::from_str(
            r#"{
                "fields": {
                    "餐别": 42,
                    "成人份数": {"value": 2}
                }
            }"#,
        )
        .unwrap();

        assert!(matches!(record.fields.meals, Some(MealSelection::Other(_))));
        assert!(matches!(record.fields.adults, Some(Quantity::Other(_))));
        assert_eq!(record.fields.date, None);
    }

    #[test]
    fn test_empty_fields_object() {
        let record: RawRecord = serde_json::from_str(r#"{"fields": {}}"#).unwrap();
        assert_eq!(record.fields.date, None);
        assert_eq!(record.fields.name, None);
        assert_eq!(record.modified_at(), 0);
    }

    // ========== Headcount / limits ==========

    #[test]
    fn test_headcount_total() {
        let headcount = Headcount {
            adults: 3,
            children: 2,
        };
        assert_eq!(headcount.total(), 5);
        assert_eq!(Headcount::default().total(), 0);
    }

    #[test]
    fn test_default_limits() {
        let limits = QuantityLimits::default();
        assert_eq!(limits.adult_max, 2);
        assert_eq!(limits.child_max, 2);
    }
}
