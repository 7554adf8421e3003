#[cfg(test)]
mod tests {
    use se4all_data::test_utils::TestContext;

    #[tokio::test]
    async fn test_state_codes_are_lowercased() {
        let ctx = TestContext::new().await;

        let codes = ctx.db.get_state_codes().await.unwrap();
        assert_eq!(codes.len(), 3);
        assert_eq!(codes.get("Lagos").map(String::as_str), Some("ngla"));
        assert_eq!(codes.get("Kano").map(String::as_str), Some("ngkn"));
        assert_eq!(codes.get("Federal Capital Territory").map(String::as_str), Some("ngfc"));
        assert!(codes.values().all(|code| code.chars().all(|c| !c.is_uppercase())));

        ctx.cleanup().await;
    }

    #[tokio::test]
    async fn test_unnamed_boundary_rows_are_skipped() {
        let ctx = TestContext::new().await;

        // Seeded NGZZ has a NULL adm1_en
        let codes = ctx.db.get_state_codes().await.unwrap();
        assert!(!codes.values().any(|code| code == "ngzz"));

        let regions = ctx.db.get_regions().await.unwrap();
        assert!(regions.iter().all(|r| r.code != "ngzz"));

        ctx.cleanup().await;
    }

    #[tokio::test]
    async fn test_regions_carry_geojson_boundaries() {
        let ctx = TestContext::new().await;

        let regions = ctx.db.get_regions().await.unwrap();
        let names: Vec<&str> = regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Federal Capital Territory", "Kano", "Lagos"]);

        let lagos = regions.iter().find(|r| r.code == "ngla").unwrap();
        let boundary: serde_json::Value =
            serde_json::from_str(lagos.boundary.as_deref().unwrap()).unwrap();
        assert_eq!(boundary["type"], "Polygon");

        // Back in geographic coordinates
        let first = &boundary["coordinates"][0][0];
        let lon = first[0].as_f64().unwrap();
        let lat = first[1].as_f64().unwrap();
        assert!((2.6..4.5).contains(&lon), "lon {}", lon);
        assert!((6.2..6.8).contains(&lat), "lat {}", lat);

        ctx.cleanup().await;
    }

    #[tokio::test]
    async fn test_available_og_clusters_need_both_flags() {
        let ctx = TestContext::new().await;

        let available = ctx.db.query_available_og_clusters().await.unwrap();
        assert_eq!(available, vec!["NGLA".to_string()]);

        let statuses = ctx.db.get_region_statuses().await.unwrap();
        assert_eq!(statuses.len(), 3);
        let fct = statuses.iter().find(|s| s.adm1_pcode == "NGFC").unwrap();
        assert!(!fct.cluster_all);
        assert!(!fct.cluster_offgrid);
        assert_eq!(
            statuses.iter().filter(|s| s.has_all_clusters()).count(),
            available.len()
        );

        ctx.cleanup().await;
    }
}
