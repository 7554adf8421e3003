use serde::{Deserialize, Serialize};
use std::fmt;

/// The counters shown under "Our progress in numbers"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gauge {
    KmElectricityGridTracked,
    VillagesRemotelyMapped,
    BuildingsMapped,
}

impl Gauge {
    pub const ALL: [Gauge; 3] = [
        Gauge::KmElectricityGridTracked,
        Gauge::VillagesRemotelyMapped,
        Gauge::BuildingsMapped,
    ];

    /// View in the `web` schema holding the current value
    pub fn value_view(&self) -> &'static str {
        match self {
            Gauge::KmElectricityGridTracked => "ourprogress_kmelectricitygridtracked_value_v",
            Gauge::VillagesRemotelyMapped => "ourprogress_villagesremotelymapped_value_v",
            Gauge::BuildingsMapped => "ourprogress_buildingsmapped_value_v",
        }
    }

    /// Text matched against `ourprogress_maximums.description`
    pub fn max_description(&self) -> &'static str {
        match self {
            Gauge::KmElectricityGridTracked => "km electricity grid tracked",
            Gauge::VillagesRemotelyMapped => "villages remotely mapped",
            Gauge::BuildingsMapped => "buildings mapped",
        }
    }

    /// Template key of the gauge maximum
    pub fn max_key(&self) -> &'static str {
        match self {
            Gauge::KmElectricityGridTracked => "max_km_electricity",
            Gauge::VillagesRemotelyMapped => "max_villages",
            Gauge::BuildingsMapped => "max_buildings",
        }
    }

    pub fn from_max_key(key: &str) -> Option<Gauge> {
        Gauge::ALL.into_iter().find(|g| g.max_key() == key)
    }
}

impl fmt::Display for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.max_description())
    }
}

impl std::str::FromStr for Gauge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "km_electricity_grid_tracked" | "km_electricity" | "grid" => Ok(Gauge::KmElectricityGridTracked),
            "villages_remotely_mapped" | "villages" => Ok(Gauge::VillagesRemotelyMapped),
            "buildings_mapped" | "buildings" => Ok(Gauge::BuildingsMapped),
            other => Err(format!("unknown gauge '{}'", other)),
        }
    }
}

/// Current value and maximum of one gauge, for progress-bar rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressGauge {
    pub gauge: Gauge,
    pub current: i64,
    pub maximum: i64,
}

impl ProgressGauge {
    /// Share of the maximum reached, in percent. A zero maximum yields 0.
    pub fn percentage(&self) -> f64 {
        if self.maximum == 0 {
            return 0.0;
        }
        self.current as f64 * 100.0 / self.maximum as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_keys_round_trip() {
        for gauge in Gauge::ALL {
            assert_eq!(Gauge::from_max_key(gauge.max_key()), Some(gauge));
        }
        assert_eq!(Gauge::from_max_key("max_unknown"), None);
    }

    #[test]
    fn test_value_views_follow_naming_convention() {
        for gauge in Gauge::ALL {
            let view = gauge.value_view();
            assert!(view.starts_with("ourprogress_"));
            assert!(view.ends_with("_value_v"));
        }
    }

    #[test]
    fn test_parse_gauge_names() {
        assert_eq!("villages".parse::<Gauge>().unwrap(), Gauge::VillagesRemotelyMapped);
        assert_eq!("buildings-mapped".parse::<Gauge>().unwrap(), Gauge::BuildingsMapped);
        assert_eq!("KM_ELECTRICITY".parse::<Gauge>().unwrap(), Gauge::KmElectricityGridTracked);
        assert!("rivers".parse::<Gauge>().is_err());
    }

    #[test]
    fn test_percentage() {
        let gauge = ProgressGauge { gauge: Gauge::BuildingsMapped, current: 25, maximum: 200 };
        assert!((gauge.percentage() - 12.5).abs() < f64::EPSILON);

        let empty = ProgressGauge { gauge: Gauge::BuildingsMapped, current: 25, maximum: 0 };
        assert_eq!(empty.percentage(), 0.0);
    }
}
