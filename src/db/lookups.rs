use std::collections::HashMap;
use std::fmt;

use sqlx::PgPool;

/// Reference tables mapping numeric ids to display names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupTable {
    Brand,
    Category,
}

impl LookupTable {
    fn query(&self) -> &'static str {
        match self {
            LookupTable::Brand => {
                "SELECT brand_id, brand_name FROM brands WHERE brand_id = ANY($1)"
            }
            LookupTable::Category => {
                "SELECT category_id, category_name FROM categories WHERE category_id = ANY($1)"
            }
        }
    }

    /// Label used when an id has no entry in the table, e.g. `Unknown Brand (7)`
    pub fn fallback_label(&self, id: i64) -> String {
        format!("Unknown {} ({})", self, id)
    }
}

impl fmt::Display for LookupTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupTable::Brand => write!(f, "Brand"),
            LookupTable::Category => write!(f, "Category"),
        }
    }
}

/// Read-only access to the brand and category name tables
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LookupStore: Send + Sync {
    async fn names(
        &self,
        table: LookupTable,
        ids: &[i64],
    ) -> Result<HashMap<i64, String>, sqlx::Error>;
}

#[derive(Clone)]
pub struct PgLookupStore {
    pool: PgPool,
}

impl PgLookupStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl LookupStore for PgLookupStore {
    async fn names(
        &self,
        table: LookupTable,
        ids: &[i64],
    ) -> Result<HashMap<i64, String>, sqlx::Error> {
        let rows: Vec<(i64, String)> = sqlx::query_as(table.query())
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_labels() {
        assert_eq!(LookupTable::Brand.fallback_label(7), "Unknown Brand (7)");
        assert_eq!(
            LookupTable::Category.fallback_label(4021),
            "Unknown Category (4021)"
        );
    }
}
