use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, PgPool, Postgres};

use crate::database::DatabaseError;
use crate::filter::{SqlParam, SqlResult};

/// Runs generated SQL with its typed parameters bound in order
pub struct QueryBuilder<'a> {
    sql: &'a SqlResult,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(sql: &'a SqlResult) -> Self {
        Self { sql }
    }

    pub async fn select_all<T>(self, pool: &PgPool) -> Result<Vec<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut q = sqlx::query_as::<_, T>(&self.sql.query);
        for p in self.sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_all(pool).await?)
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        SqlParam::Uuid(u) => q.bind(*u),
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Date(d) => q.bind(*d),
    }
}
