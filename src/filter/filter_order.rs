use std::cmp::Ordering;

use crate::database::models::PolicyRecord;

pub struct FilterOrder;

impl FilterOrder {
    /// Listing order: designated date, newest first, ties broken by creation time
    pub const DEFAULT: [&'static str; 2] = ["designated_date", "created_at"];

    /// Every listed column sorts descending
    pub fn generate(columns: &[&str]) -> String {
        if columns.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = columns.iter().map(|c| format!("\"{}\" DESC", c)).collect();
        format!("ORDER BY {}", parts.join(", "))
    }

    pub fn compare(a: &PolicyRecord, b: &PolicyRecord) -> Ordering {
        b.designated_date()
            .cmp(&a.designated_date())
            .then_with(|| b.created_at.cmp(&a.created_at))
    }

    pub fn sort(records: &mut [PolicyRecord]) {
        records.sort_by(Self::compare);
    }
}
