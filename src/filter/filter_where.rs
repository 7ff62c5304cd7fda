use super::filter::PolicyQuery;
use super::types::SqlParam;

/// Builds the WHERE clause of a policy listing with `$n` placeholders
pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    conditions: Vec<String>,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self {
            param_values: vec![],
            conditions: vec![],
        }
    }

    pub fn generate(query: &PolicyQuery) -> (String, Vec<SqlParam>) {
        let mut filter_where = Self::new();
        filter_where.build(query)
    }

    fn build(&mut self, query: &PolicyQuery) -> (String, Vec<SqlParam>) {
        // owner scope comes first and is never optional
        let owner = self.param(SqlParam::Uuid(query.owner()));
        self.conditions.push(format!("\"created_by\" = {}", owner));

        let policy_type = self.param(SqlParam::Text(query.policy_type().as_str().to_string()));
        self.conditions.push(format!("\"policy_type\" = {}", policy_type));

        let filter = query.filter();
        if let Some(range) = filter.date_range {
            let start = self.param(SqlParam::Date(range.start));
            let end = self.param(SqlParam::Date(range.end));
            self.conditions.push(format!("\"designated_date\" BETWEEN {} AND {}", start, end));
        }

        if let Some(search) = &filter.search {
            let pattern = self.param(SqlParam::Text(format!("%{}%", escape_like(search))));
            self.conditions.push(format!("\"holder_name\" ILIKE {} ESCAPE '\\'", pattern));
        }

        (self.conditions.join(" AND "), std::mem::take(&mut self.param_values))
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }
}

impl Default for FilterWhere {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape LIKE metacharacters so user input matches literally
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
