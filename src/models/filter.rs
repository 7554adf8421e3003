use serde::{Deserialize, Serialize};
use std::fmt;

use super::ClusterColumn;

/// Open numeric interval: a value matches when `low < value < high`.
///
/// A reversed range (`low > high`) is accepted and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
}

impl ValueRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value > self.low && value < self.high
    }

    pub fn is_reversed(&self) -> bool {
        self.low > self.high
    }
}

impl From<(f64, f64)> for ValueRange {
    fn from((low, high): (f64, f64)) -> Self {
        Self::new(low, high)
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// Parses `LOW,HIGH`
impl std::str::FromStr for ValueRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (low, high) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LOW,HIGH but got '{}'", s))?;
        let low: f64 = low.trim().parse().map_err(|e| format!("invalid lower bound '{}': {}", low, e))?;
        let high: f64 = high.trim().parse().map_err(|e| format!("invalid upper bound '{}': {}", high, e))?;
        if !low.is_finite() || !high.is_finite() {
            return Err(format!("range bounds must be finite: '{}'", s));
        }
        Ok(Self::new(low, high))
    }
}

/// Optional range filters over cluster views. Every active range must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterFilter {
    /// `area_km2`
    pub area: Option<ValueRange>,
    /// `grid_dist_km`
    pub distance_grid: Option<ValueRange>,
    /// `building_count`, off-grid views only
    pub building: Option<ValueRange>,
    /// `percentage_building_area`, off-grid views only
    pub buildingfp: Option<ValueRange>,
}

impl ClusterFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn area(mut self, low: f64, high: f64) -> Self {
        self.area = Some(ValueRange::new(low, high));
        self
    }

    pub fn distance_grid(mut self, low: f64, high: f64) -> Self {
        self.distance_grid = Some(ValueRange::new(low, high));
        self
    }

    pub fn building(mut self, low: f64, high: f64) -> Self {
        self.building = Some(ValueRange::new(low, high));
        self
    }

    pub fn buildingfp(mut self, low: f64, high: f64) -> Self {
        self.buildingfp = Some(ValueRange::new(low, high));
        self
    }

    /// Active ranges with their columns, in clause order
    pub fn active(&self) -> Vec<(ClusterColumn, ValueRange)> {
        [
            (ClusterColumn::AreaKm2, self.area),
            (ClusterColumn::GridDistKm, self.distance_grid),
            (ClusterColumn::BuildingCount, self.building),
            (ClusterColumn::PercentageBuildingArea, self.buildingfp),
        ]
        .into_iter()
        .filter_map(|(column, range)| range.map(|r| (column, r)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active().is_empty()
    }
}

/// What a filtered cluster query returns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projection {
    /// Every declared column of the view
    #[default]
    All,
    /// Only the listed columns, in the given order
    Columns(Vec<ClusterColumn>),
    /// A single row holding `COUNT(column)` under the key `count`
    Count(ClusterColumn),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds_are_exclusive() {
        let range = ValueRange::new(10.0, 50.0);
        assert!(range.contains(10.5));
        assert!(range.contains(49.9));
        assert!(!range.contains(10.0));
        assert!(!range.contains(50.0));
    }

    #[test]
    fn test_reversed_range_matches_nothing() {
        let range = ValueRange::new(50.0, 10.0);
        assert!(range.is_reversed());
        for value in [0.0, 10.0, 30.0, 50.0, 60.0] {
            assert!(!range.contains(value));
        }
    }

    #[test]
    fn test_parse_range() {
        assert_eq!("10,50".parse::<ValueRange>().unwrap(), ValueRange::new(10.0, 50.0));
        assert_eq!(" 0.5 , 2 ".parse::<ValueRange>().unwrap(), ValueRange::new(0.5, 2.0));
        assert!("10".parse::<ValueRange>().is_err());
        assert!("a,b".parse::<ValueRange>().is_err());
        assert!("NaN,1".parse::<ValueRange>().is_err());
    }

    #[test]
    fn test_active_ranges_keep_clause_order() {
        let filter = ClusterFilter::new().buildingfp(1.0, 2.0).area(10.0, 50.0);
        let active = filter.active();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].0, ClusterColumn::AreaKm2);
        assert_eq!(active[1].0, ClusterColumn::PercentageBuildingArea);
        assert!(ClusterFilter::new().is_empty());
    }
}
