#[cfg(test)]
mod tests {
    use se4all_data::db::WEB_SCHEMA;
    use se4all_data::models::OG_SAMPLE_COLUMNS;
    use se4all_data::test_utils::TestContext;
    use se4all_data::QueryError;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_random_cluster_among_five_largest() {
        let ctx = TestContext::new().await;

        // Lagos areas by size: ids 1..=5 are the five largest
        let allowed: HashSet<&str> = ["1", "2", "3", "4", "5"].into_iter().collect();
        let mut seen = HashSet::new();

        for _ in 0..40 {
            let sample = ctx.db.get_random_og_cluster("ngla", Some(WEB_SCHEMA), 5).await.unwrap();
            assert!(
                allowed.contains(sample.cluster_offgrid_id.as_str()),
                "picked cluster {} outside the five largest",
                sample.cluster_offgrid_id
            );
            seen.insert(sample.cluster_offgrid_id);
        }
        assert!(seen.len() > 1, "sampling never varied");

        ctx.cleanup().await;
    }

    #[tokio::test]
    async fn test_candidates_ordered_by_area() {
        let ctx = TestContext::new().await;

        let candidates = ctx.db.fetch_og_cluster_candidates("ngla", Some(WEB_SCHEMA), 5).await.unwrap();
        let areas: Vec<f64> = candidates.iter().map(|c| c.area_km2.parse().unwrap()).collect();
        assert_eq!(areas, vec![60.0, 45.0, 30.0, 20.0, 10.0]);

        ctx.cleanup().await;
    }

    #[tokio::test]
    async fn test_single_row_view_always_returns_it() {
        let ctx = TestContext::new().await;
        let codes = ctx.state_codes().await;

        for _ in 0..10 {
            let sample = ctx.db.query_random_og_cluster("Kano", &codes).await.unwrap();
            assert_eq!(sample.adm1_pcode, "NGKN");
            assert_eq!(sample.cluster_offgrid_id, "1");
            assert_eq!(sample.building_count, "200");
        }

        ctx.cleanup().await;
    }

    #[tokio::test]
    async fn test_sample_fields_are_strings_with_centroid() {
        let ctx = TestContext::new().await;

        let sample = ctx.db.get_random_og_cluster("ngkn", Some(WEB_SCHEMA), 1).await.unwrap();
        for column in OG_SAMPLE_COLUMNS {
            assert!(!sample.get(column).unwrap().is_empty(), "{} is empty", column);
        }

        let geom: serde_json::Value = serde_json::from_str(&sample.geom).unwrap();
        assert_eq!(geom["type"], "Point");
        let lon = geom["coordinates"][0].as_f64().unwrap();
        let lat = geom["coordinates"][1].as_f64().unwrap();
        assert!((lon - 8.5).abs() < 1e-3, "lon {}", lon);
        assert!((lat - 12.0).abs() < 1e-3, "lat {}", lat);

        ctx.cleanup().await;
    }

    #[tokio::test]
    async fn test_empty_view_is_an_error() {
        let ctx = TestContext::new().await;
        let codes = ctx.state_codes().await;

        let err = ctx
            .db
            .query_random_og_cluster("Federal Capital Territory", &codes)
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::EmptyView { .. }), "got {:?}", err);

        ctx.cleanup().await;
    }

    #[tokio::test]
    async fn test_unknown_state_is_an_error() {
        let ctx = TestContext::new().await;
        let codes = ctx.state_codes().await;

        let err = ctx.db.query_random_og_cluster("Atlantis", &codes).await.unwrap_err();
        match err {
            QueryError::UnknownState { name } => assert_eq!(name, "Atlantis"),
            other => panic!("expected UnknownState, got {:?}", other),
        }

        ctx.cleanup().await;
    }

    #[tokio::test]
    async fn test_invalid_view_code_is_rejected() {
        let ctx = TestContext::new().await;

        let err = ctx
            .db
            .get_random_og_cluster("ngla_mv; DROP TABLE web.cluster_offgrid; --", Some(WEB_SCHEMA), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidIdentifier { .. }));

        ctx.cleanup().await;
    }
}
