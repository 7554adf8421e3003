use serde::{Deserialize, Serialize};

/// First-level administrative boundary (`se4all.boundary_adm1`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministrativeRegion {
    /// Lowercased `adm1_pcode`
    pub code: String,
    /// `adm1_en`
    pub name: String,
    /// Boundary as GeoJSON in EPSG:4326
    pub boundary: Option<String>,
}

/// Cluster availability flags for one region (`se4all.boundary_adm1_status`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionStatus {
    pub adm1_pcode: String,
    pub cluster_all: bool,
    pub cluster_offgrid: bool,
}

impl RegionStatus {
    pub fn has_all_clusters(&self) -> bool {
        self.cluster_all && self.cluster_offgrid
    }
}
