use crate::error::Result;
use prometheus::{GaugeVec, Opts, Registry};

/// A string-valued metric: one series fixed at `1` whose single label
/// carries the current value.
#[derive(Clone)]
pub struct InfoMetric {
    vec: GaugeVec,
}

impl InfoMetric {
    pub fn register(
        registry: &Registry,
        name: &str,
        help: &str,
        label: &str,
    ) -> Result<Self> {
        let vec = GaugeVec::new(Opts::new(name, help), &[label])?;
        registry.register(Box::new(vec.clone()))?;
        Ok(Self { vec })
    }

    /// Replaces the previous value; only the latest one is exposed.
    pub fn set(&self, value: &str) {
        self.vec.reset();
        self.vec.with_label_values(&[value]).set(1.0);
    }

    pub fn set_bool(&self, value: bool) {
        self.set(if value { "True" } else { "False" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_keeps_single_series() {
        let registry = Registry::new();
        let info = InfoMetric::register(&registry, "test_map_info", "Map", "map_name").unwrap();

        info.set("Olympus");
        info.set("Kings Canyon");

        let families = registry.gather();
        assert_eq!(families.len(), 1);
        let metrics = families[0].get_metric();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].get_label()[0].get_value(), "Kings Canyon");
        assert_eq!(metrics[0].get_gauge().get_value(), 1.0);
    }

    #[test]
    fn test_info_bool_rendering() {
        let registry = Registry::new();
        let info = InfoMetric::register(&registry, "test_banned_info", "Banned", "banned").unwrap();

        info.set_bool(false);

        let families = registry.gather();
        assert_eq!(families[0].get_metric()[0].get_label()[0].get_value(), "False");
    }
}
