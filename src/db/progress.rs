use super::helpers::{decode_cell, escape_like};
use super::{Database, WEB_SCHEMA};
use crate::errors::{query::QueryResult, QueryError};
use crate::models::{value_as_i64, Gauge, ProgressGauge};

impl Database {
    /// Current value of a progress gauge: first column of the first row of
    /// its value view, truncated to an integer.
    pub async fn query_progress(&self, gauge: Gauge) -> QueryResult<i64> {
        self.query_view_counter(gauge.value_view(), Some(WEB_SCHEMA)).await
    }

    /// First column of the first row of a view as an integer.
    /// A view without rows is `EmptyView`.
    pub async fn query_view_counter(&self, view: &str, schema: Option<&str>) -> QueryResult<i64> {
        let rows = self.select_materialized_view(view, schema, Some(1)).await?;

        let cell = rows
            .first()
            .and_then(|row| row.cells.first())
            .ok_or_else(|| match schema {
                Some(schema) => QueryError::empty_view(format!("{}.{}", schema, view)),
                None => QueryError::empty_view(view),
            })?;

        value_as_i64(&cell.value).ok_or_else(|| QueryError::NotAnInteger {
            column: cell.name.clone(),
        })
    }

    pub async fn query_electrified_km(&self) -> QueryResult<i64> {
        self.query_progress(Gauge::KmElectricityGridTracked).await
    }

    pub async fn query_mapped_villages(&self) -> QueryResult<i64> {
        self.query_progress(Gauge::VillagesRemotelyMapped).await
    }

    pub async fn query_mapped_buildings(&self) -> QueryResult<i64> {
        self.query_progress(Gauge::BuildingsMapped).await
    }

    /// Maximum of the gauge whose description contains `description`
    /// (case-insensitive), rendered as an integer string.
    pub async fn query_gauge_maximum(&self, description: &str) -> QueryResult<String> {
        Ok(self.gauge_maximum(description).await?.to_string())
    }

    /// Current value and maximum of a gauge
    pub async fn query_gauge(&self, gauge: Gauge) -> QueryResult<ProgressGauge> {
        let current = self.query_progress(gauge).await?;
        let maximum = self.gauge_maximum(gauge.max_description()).await?;
        Ok(ProgressGauge { gauge, current, maximum })
    }

    async fn gauge_maximum(&self, description: &str) -> QueryResult<i64> {
        let pattern = format!("%{}%", escape_like(description));

        let row = sqlx::query(
            "SELECT maximum FROM web.ourprogress_maximums WHERE description ILIKE $1 LIMIT 1",
        )
        .bind(&pattern)
        .fetch_optional(&self.pool)
        .await?;

        let row = match row {
            Some(row) => row,
            None => {
                tracing::warn!("No gauge maximum matches description '{}'", description);
                return Err(QueryError::not_found(format!("Gauge maximum for '{}'", description)));
            }
        };

        let value = decode_cell(&row, 0)?;
        value_as_i64(&value).ok_or_else(|| QueryError::NotAnInteger {
            column: "maximum".to_string(),
        })
    }
}
