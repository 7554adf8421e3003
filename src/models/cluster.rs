use serde::{Deserialize, Serialize};
use std::fmt;

/// Which family of per-state cluster views a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterKind {
    /// Grid-connected and off-grid clusters (`cluster_all_<code>_mv`)
    All,
    /// Off-grid clusters only (`cluster_offgrid_<code>_mv`)
    Offgrid,
}

const ALL_COLUMNS: &[ClusterColumn] = &[
    ClusterColumn::Adm1Pcode,
    ClusterColumn::ClusterAllId,
    ClusterColumn::AreaKm2,
    ClusterColumn::GridDistKm,
    ClusterColumn::Geom,
];

const OFFGRID_COLUMNS: &[ClusterColumn] = &[
    ClusterColumn::Adm1Pcode,
    ClusterColumn::ClusterOffgridId,
    ClusterColumn::AreaKm2,
    ClusterColumn::BuildingCount,
    ClusterColumn::PercentageBuildingArea,
    ClusterColumn::GridDistKm,
    ClusterColumn::Geom,
];

impl ClusterKind {
    /// View name for a lowercase state code, without schema
    pub fn view_name(&self, state_code: &str) -> String {
        match self {
            ClusterKind::All => format!("cluster_all_{}_mv", state_code),
            ClusterKind::Offgrid => format!("cluster_offgrid_{}_mv", state_code),
        }
    }

    /// Declared columns of the view, in view order
    pub fn columns(&self) -> &'static [ClusterColumn] {
        match self {
            ClusterKind::All => ALL_COLUMNS,
            ClusterKind::Offgrid => OFFGRID_COLUMNS,
        }
    }

    pub fn has_column(&self, column: ClusterColumn) -> bool {
        self.columns().contains(&column)
    }
}

/// Columns of the cluster views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterColumn {
    Adm1Pcode,
    ClusterAllId,
    ClusterOffgridId,
    AreaKm2,
    BuildingCount,
    PercentageBuildingArea,
    GridDistKm,
    Geom,
}

impl ClusterColumn {
    pub fn name(&self) -> &'static str {
        match self {
            ClusterColumn::Adm1Pcode => "adm1_pcode",
            ClusterColumn::ClusterAllId => "cluster_all_id",
            ClusterColumn::ClusterOffgridId => "cluster_offgrid_id",
            ClusterColumn::AreaKm2 => "area_km2",
            ClusterColumn::BuildingCount => "building_count",
            ClusterColumn::PercentageBuildingArea => "percentage_building_area",
            ClusterColumn::GridDistKm => "grid_dist_km",
            ClusterColumn::Geom => "geom",
        }
    }

    /// SELECT expression producing a decodable value under the column's own name.
    /// Geometry is reprojected to EPSG:4326 and serialized as GeoJSON.
    pub fn select_expr(&self) -> &'static str {
        match self {
            ClusterColumn::Adm1Pcode => "adm1_pcode::text AS adm1_pcode",
            ClusterColumn::ClusterAllId => "cluster_all_id::int8 AS cluster_all_id",
            ClusterColumn::ClusterOffgridId => "cluster_offgrid_id::int8 AS cluster_offgrid_id",
            ClusterColumn::AreaKm2 => "area_km2::float8 AS area_km2",
            ClusterColumn::BuildingCount => "building_count::int8 AS building_count",
            ClusterColumn::PercentageBuildingArea => {
                "percentage_building_area::float8 AS percentage_building_area"
            }
            ClusterColumn::GridDistKm => "grid_dist_km::float8 AS grid_dist_km",
            ClusterColumn::Geom => "ST_AsGeoJSON(ST_Transform(geom, 4326)) AS geom",
        }
    }
}

impl fmt::Display for ClusterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ClusterColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OFFGRID_COLUMNS
            .iter()
            .chain(std::iter::once(&ClusterColumn::ClusterAllId))
            .copied()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| format!("unknown cluster column '{}'", s))
    }
}

/// Columns of `get_random_og_cluster`, in output order
pub const OG_SAMPLE_COLUMNS: [&str; 7] = [
    "adm1_pcode",
    "cluster_offgrid_id",
    "area_km2",
    "building_count",
    "percentage_building_area",
    "grid_dist_km",
    "geom",
];

/// One off-grid cluster picked at random, every field rendered as a string.
/// `geom` is the centroid as GeoJSON in EPSG:4326.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffgridClusterSample {
    pub adm1_pcode: String,
    pub cluster_offgrid_id: String,
    pub area_km2: String,
    pub building_count: String,
    pub percentage_building_area: String,
    pub grid_dist_km: String,
    pub geom: String,
}

impl OffgridClusterSample {
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "adm1_pcode" => &self.adm1_pcode,
            "cluster_offgrid_id" => &self.cluster_offgrid_id,
            "area_km2" => &self.area_km2,
            "building_count" => &self.building_count,
            "percentage_building_area" => &self.percentage_building_area,
            "grid_dist_km" => &self.grid_dist_km,
            "geom" => &self.geom,
            _ => return None,
        };
        Some(value.as_str())
    }
}
