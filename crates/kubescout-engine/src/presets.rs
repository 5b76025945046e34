//! Curated chart presets
//!
//! Popular chart names collide across many publishers on Artifact Hub. A
//! preset pins such a chart to the repository that actually maintains it, so
//! resolution can skip search entirely.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Built-in presets: chart name -> (repository, package)
static BUILTIN_PRESETS: phf::Map<&'static str, (&'static str, &'static str)> = phf::phf_map! {
    "argo-cd" => ("argo", "argo-cd"),
    "aws-load-balancer-controller" => ("aws", "aws-load-balancer-controller"),
    "karpenter" => ("aws-karpenter", "karpenter"),
    "keda" => ("kedacore", "keda"),
    "cert-manager" => ("cert-manager", "cert-manager"),
    "ingress-nginx" => ("ingress-nginx", "ingress-nginx"),
    "prometheus" => ("prometheus-community", "prometheus"),
    "kube-prometheus-stack" => ("prometheus-community", "kube-prometheus-stack"),
    "external-dns" => ("external-dns", "external-dns"),
    "n8n" => ("community-charts", "n8n"),
};

/// An exact upstream package location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Repository name on the registry
    pub repository: String,
    /// Package name within the repository
    pub package: String,
}

impl Preset {
    pub fn new(repository: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            package: package.into(),
        }
    }
}

/// Immutable chart name -> preset mapping
///
/// Built once at startup and shared read-only between resolution units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetTable {
    entries: BTreeMap<String, Preset>,
}

impl PresetTable {
    /// The built-in presets
    pub fn builtin() -> Self {
        BUILTIN_PRESETS
            .entries()
            .map(|(chart, (repository, package))| {
                (chart.to_string(), Preset::new(*repository, *package))
            })
            .collect()
    }

    /// Layer `overrides` on top of this table, replacing entries with the same chart name
    #[must_use]
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, Preset)>,
    {
        self.entries.extend(overrides);
        self
    }

    /// Look up the preset for a chart name (exact match)
    pub fn get(&self, chart_name: &str) -> Option<&Preset> {
        self.entries.get(chart_name)
    }

    pub fn contains(&self, chart_name: &str) -> bool {
        self.entries.contains_key(chart_name)
    }

    /// Iterate in chart name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Preset)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Preset)> for PresetTable {
    fn from_iter<I: IntoIterator<Item = (String, Preset)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = PresetTable::builtin();
        assert_eq!(table.len(), 10);
        assert_eq!(table.get("karpenter"), Some(&Preset::new("aws-karpenter", "karpenter")));
        assert_eq!(
            table.get("kube-prometheus-stack"),
            Some(&Preset::new("prometheus-community", "kube-prometheus-stack"))
        );
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = PresetTable::builtin();
        assert!(table.contains("keda"));
        assert!(!table.contains("KEDA"));
        assert!(!table.contains("keda-add-ons-http"));
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let table = PresetTable::builtin().with_overrides([
            ("keda".to_string(), Preset::new("my-mirror", "keda")),
            ("loki".to_string(), Preset::new("grafana", "loki")),
        ]);

        assert_eq!(table.len(), 11);
        assert_eq!(table.get("keda").unwrap().repository, "my-mirror");
        assert_eq!(table.get("loki").unwrap().package, "loki");
    }

    #[test]
    fn test_iteration_is_sorted() {
        let table = PresetTable::builtin();
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}
