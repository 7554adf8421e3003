use rand::Rng;
use sqlx::{Postgres, QueryBuilder, Row};
use std::collections::HashMap;

use super::helpers::{
    apply_limit, apply_projection, apply_range_filters, ensure_filter_columns, map_row_to_view_row,
    qualified_name,
};
use super::{Database, WEB_SCHEMA};
use crate::errors::{query::QueryResult, QueryError};
use crate::models::{ClusterFilter, ClusterKind, OffgridClusterSample, Projection, ViewRow};

/// Number of largest clusters `get_random_og_cluster` picks from by default
pub const DEFAULT_SAMPLE_LIMIT: i64 = 5;

const OG_SAMPLE_SELECT: &str = r#"
    SELECT adm1_pcode::text AS adm1_pcode,
           cluster_offgrid_id::text AS cluster_offgrid_id,
           area_km2::text AS area_km2,
           building_count::text AS building_count,
           percentage_building_area::text AS percentage_building_area,
           grid_dist_km::text AS grid_dist_km,
           ST_AsGeoJSON(ST_Centroid(ST_Transform(geom, 4326))) AS geom
    FROM "#;

impl Database {
    /// Runs a filtered, projected SELECT over one cluster view.
    ///
    /// Every active range in `filter` becomes an exclusive bound; all of them
    /// must hold. Ranges and the limit are bound as parameters.
    pub async fn filter_materialized_view(
        &self,
        kind: ClusterKind,
        view_name: &str,
        schema: Option<&str>,
        filter: &ClusterFilter,
        limit: Option<i64>,
        projection: &Projection,
    ) -> QueryResult<Vec<ViewRow>> {
        let view = qualified_name(schema, view_name)?;
        ensure_filter_columns(kind, filter, &view)?;

        let mut query = QueryBuilder::<Postgres>::new("SELECT ");
        apply_projection(&mut query, kind, projection, &view)?;
        query.push(" FROM ");
        query.push(&view);
        apply_range_filters(&mut query, filter);
        apply_limit(&mut query, limit);

        tracing::debug!("Filtering {}: {}", view, query.sql());
        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(map_row_to_view_row).collect()
    }

    /// Filtered rows of a state's `cluster_all_<code>_mv` view.
    /// Only area and grid-distance ranges apply to these views.
    ///
    /// An unknown state name is logged and yields no rows.
    pub async fn query_filtered_clusters(
        &self,
        state_name: &str,
        state_codes: &HashMap<String, String>,
        filter: &ClusterFilter,
        limit: Option<i64>,
        projection: &Projection,
    ) -> QueryResult<Vec<ViewRow>> {
        self.query_filtered_state(ClusterKind::All, state_name, state_codes, filter, limit, projection)
            .await
    }

    /// Filtered rows of a state's `cluster_offgrid_<code>_mv` view.
    ///
    /// An unknown state name is logged and yields no rows.
    pub async fn query_filtered_og_clusters(
        &self,
        state_name: &str,
        state_codes: &HashMap<String, String>,
        filter: &ClusterFilter,
        limit: Option<i64>,
        projection: &Projection,
    ) -> QueryResult<Vec<ViewRow>> {
        self.query_filtered_state(ClusterKind::Offgrid, state_name, state_codes, filter, limit, projection)
            .await
    }

    async fn query_filtered_state(
        &self,
        kind: ClusterKind,
        state_name: &str,
        state_codes: &HashMap<String, String>,
        filter: &ClusterFilter,
        limit: Option<i64>,
        projection: &Projection,
    ) -> QueryResult<Vec<ViewRow>> {
        let Some(code) = state_codes.get(state_name) else {
            tracing::warn!("Non existent state name: {}", state_name);
            return Ok(Vec::new());
        };

        let view_name = kind.view_name(code);
        self.filter_materialized_view(kind, &view_name, Some(WEB_SCHEMA), filter, limit, projection)
            .await
    }

    /// The `limit` largest off-grid clusters of a state, by area descending
    pub async fn fetch_og_cluster_candidates(
        &self,
        view_code: &str,
        schema: Option<&str>,
        limit: i64,
    ) -> QueryResult<Vec<OffgridClusterSample>> {
        let view = qualified_name(schema, &ClusterKind::Offgrid.view_name(view_code))?;

        let mut query = QueryBuilder::<Postgres>::new(OG_SAMPLE_SELECT);
        query.push(&view);
        query.push(" ORDER BY area_km2 DESC");
        apply_limit(&mut query, Some(limit.max(0)));

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(map_row_to_og_sample).collect()
    }

    /// Picks one cluster uniformly at random among the `limit` largest of
    /// `cluster_offgrid_<view_code>_mv`. Fails with `EmptyView` when the view
    /// has no rows.
    pub async fn get_random_og_cluster(
        &self,
        view_code: &str,
        schema: Option<&str>,
        limit: i64,
    ) -> QueryResult<OffgridClusterSample> {
        let candidates = self.fetch_og_cluster_candidates(view_code, schema, limit).await?;

        let mut rng = rand::thread_rng();
        pick_sample(&candidates, limit, &mut rng).cloned().ok_or_else(|| {
            let view = ClusterKind::Offgrid.view_name(view_code);
            tracing::warn!("No off-grid cluster to sample from {}", view);
            QueryError::empty_view(view)
        })
    }

    /// Random off-grid cluster of a state, among its 5 largest
    pub async fn query_random_og_cluster(
        &self,
        state_name: &str,
        state_codes: &HashMap<String, String>,
    ) -> QueryResult<OffgridClusterSample> {
        let code = state_codes
            .get(state_name)
            .ok_or_else(|| QueryError::unknown_state(state_name))?;
        self.get_random_og_cluster(code, Some(WEB_SCHEMA), DEFAULT_SAMPLE_LIMIT).await
    }
}

/// Uniform choice among the first `min(limit, candidates.len())` candidates
pub fn pick_sample<'a, T, R>(candidates: &'a [T], limit: i64, rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    let bound = usize::try_from(limit.max(0)).unwrap_or(usize::MAX).min(candidates.len());
    if bound == 0 {
        return None;
    }
    candidates.get(rng.gen_range(0..bound))
}

fn map_row_to_og_sample(row: &sqlx::postgres::PgRow) -> QueryResult<OffgridClusterSample> {
    let text = |name: &str| -> QueryResult<String> {
        Ok(row.try_get::<Option<String>, _>(name)?.unwrap_or_default())
    };
    Ok(OffgridClusterSample {
        adm1_pcode: text("adm1_pcode")?,
        cluster_offgrid_id: text("cluster_offgrid_id")?,
        area_km2: text("area_km2")?,
        building_count: text("building_count")?,
        percentage_building_area: text("percentage_building_area")?,
        grid_dist_km: text("grid_dist_km")?,
        geom: text("geom")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_sample_stays_within_limit() {
        let candidates: Vec<u32> = (0..10).collect();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let picked = pick_sample(&candidates, 5, &mut rng).unwrap();
            assert!(*picked < 5, "picked {} outside the top 5", picked);
        }
    }

    #[test]
    fn test_pick_sample_reaches_every_candidate() {
        let candidates = ["a", "b", "c"];
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..300 {
            seen.insert(*pick_sample(&candidates, 5, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_pick_sample_single_candidate() {
        let candidates = ["only"];
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(pick_sample(&candidates, 5, &mut rng), Some(&"only"));
        }
    }

    #[test]
    fn test_pick_sample_empty_or_zero_limit() {
        let mut rng = StdRng::seed_from_u64(3);
        let empty: [u8; 0] = [];
        assert_eq!(pick_sample(&empty, 5, &mut rng), None);
        assert_eq!(pick_sample(&[1, 2, 3], 0, &mut rng), None);
        assert_eq!(pick_sample(&[1, 2, 3], -4, &mut rng), None);
    }
}
