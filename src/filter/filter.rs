use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{DateRange, FilterParams, SqlResult};
use crate::database::models::PolicyRecord;
use crate::policy::PolicyType;

/// Columns read back by the SQL store
pub const POLICY_COLUMNS: &str = "\"id\", \"policy_type\", \"created_by\", \"document\", \"created_at\", \"updated_at\"";
pub const POLICY_TABLE: &str = "policies";

/// Resolved month/year/search restriction for a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyFilter {
    pub date_range: Option<DateRange>,
    pub search: Option<String>,
}

impl PolicyFilter {
    /// Resolve raw parameters. `today` supplies the year when only a month is given.
    ///
    /// Month wins over year-only; month `0` is January, not "absent".
    pub fn resolve(params: &FilterParams, today: NaiveDate) -> Self {
        let month = params.month.as_deref().and_then(parse_month);
        let year = params.year.as_deref().and_then(parse_year);

        let date_range = match (month, year) {
            (Some(month0), year) => DateRange::month(year.unwrap_or_else(|| today.year()), month0),
            (None, Some(year)) => DateRange::year(year),
            (None, None) => None,
        };

        let search = params.search.as_ref().filter(|s| !s.is_empty()).cloned();

        Self { date_range, search }
    }

    pub fn matches(&self, record: &PolicyRecord) -> bool {
        if let Some(range) = &self.date_range {
            match record.designated_date() {
                Some(date) if range.contains(date) => {}
                _ => return false,
            }
        }

        if let Some(search) = &self.search {
            if !record.holder_name().to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }

        true
    }
}

fn parse_month(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|m| *m < 12)
}

fn parse_year(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|y| (1..=9999).contains(y))
}

/// A listing request. The owner is mandatory and always applied first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyQuery {
    owner: Uuid,
    policy_type: PolicyType,
    filter: PolicyFilter,
}

impl PolicyQuery {
    pub fn new(owner: Uuid, policy_type: PolicyType, filter: PolicyFilter) -> Self {
        Self { owner, policy_type, filter }
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn policy_type(&self) -> PolicyType {
        self.policy_type
    }

    pub fn filter(&self) -> &PolicyFilter {
        &self.filter
    }

    pub fn matches(&self, record: &PolicyRecord) -> bool {
        record.created_by == self.owner && record.policy_type == self.policy_type && self.filter.matches(record)
    }

    /// Apply the listing order in memory
    pub fn sort(&self, records: &mut [PolicyRecord]) {
        FilterOrder::sort(records);
    }

    pub fn to_sql(&self) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(self);
        let order_clause = FilterOrder::generate(&FilterOrder::DEFAULT);

        let query = [
            format!("SELECT {}", POLICY_COLUMNS),
            format!("FROM \"{}\"", POLICY_TABLE),
            format!("WHERE {}", where_clause),
            order_clause,
        ]
        .join(" ");

        SqlResult { query, params }
    }
}
