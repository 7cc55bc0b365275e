//! Aggregator service: dedup fold + per-meal headcount
//!
//! Stateless across invocations: every run re-derives the full dedup index
//! from the fetched record collection, so repeated runs over the same input
//! are idempotent.

use crate::services::{clip_quantity, normalize_meal_selection};
use crate::types::{EntryIndex, Headcount, MealKind, NormalizedEntry, QuantityLimits, RawRecord};
use chrono::NaiveDate;

/// Aggregator for turning raw registration records into headcounts
pub struct Aggregator;

impl Aggregator {
    /// Build the deduplicated entry index: at most one entry per
    /// (base date, person, meal kind), keeping the one with the highest
    /// modification timestamp.
    ///
    /// Records missing a parseable base date or a non-empty name carry no
    /// usable information and are dropped silently. Multi-select records
    /// expand to one entry per kind, each with the full clipped quantities.
    ///
    /// Replacement uses `>=`, so two records under the same key with an
    /// identical timestamp resolve to whichever is processed later. That
    /// tie-break is the one order-dependent part of the fold; everything
    /// else is invariant under permutation of `records`.
    pub fn index_latest(records: &[RawRecord], limits: QuantityLimits) -> EntryIndex {
        let mut latest = EntryIndex::new();

        for record in records {
            let base_date = match record
                .fields
                .date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
            {
                Some(d) => d,
                None => continue,
            };
            let name = match record
                .fields
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
            {
                Some(n) => n.to_string(),
                None => continue,
            };

            let adults = clip_quantity(record.fields.adults.as_ref(), limits.adult_max);
            let children = clip_quantity(record.fields.children.as_ref(), limits.child_max);
            let modified_at = record.modified_at();

            for meal in normalize_meal_selection(record.fields.meals.as_ref()) {
                let key = (base_date, name.clone(), meal);
                let newer = latest
                    .get(&key)
                    .is_none_or(|current| modified_at >= current.modified_at);
                if newer {
                    latest.insert(
                        key,
                        NormalizedEntry {
                            base_date,
                            name: name.clone(),
                            meal,
                            adults,
                            children,
                            modified_at,
                        },
                    );
                }
            }
        }

        latest
    }

    /// Sum adult/child counts over entries of `kind` that are served on
    /// `served_date`: lunch and dinner on their base date, next-day
    /// breakfast on base date + 1. Dedup already collapsed per-key
    /// duplicates, so nothing is double-counted here.
    pub fn sum_for(kind: MealKind, served_date: NaiveDate, entries: &EntryIndex) -> Headcount {
        let mut headcount = Headcount::default();
        for entry in entries.values() {
            if entry.meal != kind {
                continue;
            }
            if entry.meal.served_on(entry.base_date) != Some(served_date) {
                continue;
            }
            headcount.adults += entry.adults;
            headcount.children += entry.children;
        }
        headcount
    }
}
