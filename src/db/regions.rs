use sqlx::Row;
use std::collections::HashMap;

use super::{Database, BOUNDARY_SCHEMA};
use crate::errors::query::QueryResult;
use crate::models::{AdministrativeRegion, RegionStatus};

impl Database {
    /// Maps each region's display name to its lowercase code.
    /// An empty boundary table yields an empty map; rows without a name or
    /// code are skipped.
    pub async fn get_state_codes(&self) -> QueryResult<HashMap<String, String>> {
        let sql = format!(
            "SELECT adm1_pcode AS code, adm1_en AS name FROM {}.boundary_adm1",
            BOUNDARY_SCHEMA
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let mut codes = HashMap::with_capacity(rows.len());
        for row in &rows {
            let name: Option<String> = row.try_get("name")?;
            let code: Option<String> = row.try_get("code")?;
            match (name, code) {
                (Some(name), Some(code)) => {
                    codes.insert(name, code.to_lowercase());
                }
                (name, code) => {
                    tracing::warn!("Skipping boundary row with name {:?} and code {:?}", name, code);
                }
            }
        }

        tracing::debug!("Resolved {} state codes", codes.len());
        Ok(codes)
    }

    /// Every named region with its boundary as GeoJSON (EPSG:4326), ordered by name
    pub async fn get_regions(&self) -> QueryResult<Vec<AdministrativeRegion>> {
        let sql = format!(
            r#"
            SELECT adm1_pcode AS code,
                   adm1_en AS name,
                   ST_AsGeoJSON(ST_Transform(geom, 4326)) AS boundary
            FROM {}.boundary_adm1
            WHERE adm1_pcode IS NOT NULL AND adm1_en IS NOT NULL
            ORDER BY adm1_en
            "#,
            BOUNDARY_SCHEMA
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> QueryResult<AdministrativeRegion> {
                Ok(AdministrativeRegion {
                    code: row.try_get::<String, _>("code")?.to_lowercase(),
                    name: row.try_get("name")?,
                    boundary: row.try_get("boundary")?,
                })
            })
            .collect()
    }

    /// Codes of the regions flagged as having both grid and off-grid cluster views
    pub async fn query_available_og_clusters(&self) -> QueryResult<Vec<String>> {
        let sql = format!(
            "SELECT adm1_pcode FROM {}.boundary_adm1_status WHERE cluster_all AND cluster_offgrid",
            BOUNDARY_SCHEMA
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> QueryResult<String> { Ok(row.try_get("adm1_pcode")?) })
            .collect()
    }

    /// Cluster availability flags of every region
    pub async fn get_region_statuses(&self) -> QueryResult<Vec<RegionStatus>> {
        let sql = format!(
            r#"
            SELECT adm1_pcode,
                   COALESCE(cluster_all, false) AS cluster_all,
                   COALESCE(cluster_offgrid, false) AS cluster_offgrid
            FROM {}.boundary_adm1_status
            ORDER BY adm1_pcode
            "#,
            BOUNDARY_SCHEMA
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> QueryResult<RegionStatus> {
                Ok(RegionStatus {
                    adm1_pcode: row.try_get("adm1_pcode")?,
                    cluster_all: row.try_get("cluster_all")?,
                    cluster_offgrid: row.try_get("cluster_offgrid")?,
                })
            })
            .collect()
    }
}
