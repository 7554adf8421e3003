use sqlx::{Postgres, QueryBuilder};

use super::helpers::{apply_limit, map_row_to_view_row, qualified_name};
use super::Database;
use crate::errors::query::QueryResult;
use crate::models::ViewRow;

impl Database {
    /// Reads every row (or the first `limit`) of a view, unfiltered and in
    /// database order.
    pub async fn select_materialized_view(
        &self,
        view_name: &str,
        schema: Option<&str>,
        limit: Option<i64>,
    ) -> QueryResult<Vec<ViewRow>> {
        let view = qualified_name(schema, view_name)?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM ");
        query.push(&view);
        apply_limit(&mut query, limit);

        tracing::debug!("Reading view {} (limit {:?})", view, limit);
        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(map_row_to_view_row).collect()
    }
}
