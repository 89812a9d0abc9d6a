//! ILIKE pattern normalization and the replica search store

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::error::Result;

/// Normalize a caller-supplied query into an ILIKE substring pattern.
///
/// `*` is the user-facing wildcard and maps to `%`. Leading and trailing
/// `%` are stripped before wrapping, so `Great` and `*Great*` both become
/// `%Great%` and every query is a substring match. Literal `%` or `_`
/// inside the text are not escaped; a caller supplying them inherits SQL
/// pattern semantics.
pub fn ilike_pattern(q: &str) -> String {
    let q = q.replace('*', "%");
    let q = q.trim_matches('%');
    format!("%{q}%")
}

/// Read-only access to the replicated resource table.
#[derive(Clone)]
pub struct SearchStore {
    pool: PgPool,
    table: String,
}

impl SearchStore {
    /// Open a lazy connection pool against the replica database.
    ///
    /// Connections are established on first use, so an unreachable database
    /// surfaces per-request rather than at startup.
    pub fn connect(url: &str, table: impl Into<String>) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(5).connect_lazy(url)?;
        Ok(Self {
            pool,
            table: table.into(),
        })
    }

    /// Wrap an existing pool (used by tests that manage their own fixtures).
    pub fn with_pool(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    /// Match the `description` field of the stored JSON payloads.
    ///
    /// Returns the matching payloads rendered as newline-delimited JSON,
    /// one payload per line. All rows are collected before any byte is
    /// rendered, so a failure on a late row never leaks partial output.
    pub async fn search(&self, q: &str) -> Result<String> {
        let pattern = ilike_pattern(q);

        // `description` is not denormalized into its own column, so it is
        // extracted from the `data` payload. The table name was validated
        // as an identifier at startup; only the pattern is bound.
        let sql = format!(
            "SELECT data FROM {} WHERE data->>'description' ILIKE $1",
            self.table
        );

        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?;

        let mut out = String::new();
        for row in rows {
            let data: serde_json::Value = row.try_get("data")?;
            out.push_str(&serde_json::to_string(&data)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Cheap liveness probe for the health route.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_wraps_plain_text() {
        assert_eq!(ilike_pattern("Great"), "%Great%");
    }

    #[test]
    fn pattern_translates_star_wildcards() {
        assert_eq!(ilike_pattern("*Great*"), "%Great%");
        assert_eq!(ilike_pattern("Gr*at"), "%Gr%at%");
    }

    #[test]
    fn pattern_strips_existing_percent_edges() {
        assert_eq!(ilike_pattern("%Great%"), "%Great%");
        assert_eq!(ilike_pattern("%%Great"), "%Great%");
    }

    #[test]
    fn empty_query_matches_everything() {
        assert_eq!(ilike_pattern(""), "%%");
    }
}
