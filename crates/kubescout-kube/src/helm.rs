//! Helm v3 release record decoding
//!
//! Helm stores each release revision in a Secret (or ConfigMap) under the
//! `release` key: JSON, gzip-compressed, then base64-encoded. Records written
//! by old Helm versions may skip the gzip step, so it is detected from the
//! magic bytes rather than assumed.

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use kubescout_core::Release;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

use crate::error::{KubeError, Result};

/// Secret type Helm uses for release records
pub const HELM_RELEASE_TYPE: &str = "helm.sh/release.v1";

/// Label selector for records of currently deployed revisions
pub const DEPLOYED_SELECTOR: &str = "owner=helm,status=deployed";

/// Data key holding the encoded record
pub const RELEASE_KEY: &str = "release";

const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];

#[derive(Debug, Deserialize)]
struct HelmRecord {
    name: String,
    #[serde(default)]
    namespace: String,
    #[serde(default)]
    version: u32,
    #[serde(default)]
    info: Option<HelmInfo>,
    #[serde(default)]
    chart: Option<HelmChart>,
}

#[derive(Debug, Deserialize)]
struct HelmInfo {
    #[serde(default)]
    last_deployed: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HelmChart {
    #[serde(default)]
    metadata: Option<HelmChartMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HelmChartMetadata {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    app_version: String,
    #[serde(default)]
    icon: Option<String>,
}

/// Decode a `release` payload into a [`Release`]
///
/// `object_name` is only used for error messages; `fallback_namespace` fills
/// in records that do not carry their own namespace.
pub fn decode_release(
    object_name: &str,
    payload: &[u8],
    fallback_namespace: Option<&str>,
) -> Result<Release> {
    let text: Vec<u8> = payload
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let decoded = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &text)
        .map_err(|e| {
            KubeError::invalid_record(object_name, format!("base64 decode error: {}", e))
        })?;

    let json = if decoded.starts_with(&GZIP_MAGIC) {
        let mut decompressed = Vec::new();
        GzDecoder::new(decoded.as_slice())
            .read_to_end(&mut decompressed)
            .map_err(|e| KubeError::invalid_record(object_name, format!("gzip error: {}", e)))?;
        decompressed
    } else {
        decoded
    };

    let record: HelmRecord = serde_json::from_slice(&json)
        .map_err(|e| KubeError::invalid_record(object_name, format!("JSON error: {}", e)))?;

    let metadata = record
        .chart
        .and_then(|c| c.metadata)
        .filter(|m| !m.name.is_empty())
        .ok_or_else(|| KubeError::invalid_record(object_name, "missing chart metadata"))?;

    let namespace = if record.namespace.is_empty() {
        fallback_namespace.unwrap_or_default().to_string()
    } else {
        record.namespace
    };

    let updated = record
        .info
        .and_then(|i| i.last_deployed)
        .and_then(|ts| DateTime::parse_from_rfc3339(&ts).ok())
        .map(|ts| ts.with_timezone(&Utc));

    Ok(Release {
        name: record.name,
        namespace,
        chart_name: metadata.name,
        chart_version: metadata.version,
        app_version: metadata.app_version,
        revision: record.version,
        updated,
        icon: metadata.icon.filter(|i| !i.is_empty()),
    })
}

/// Keep the highest revision of each `namespace/name`, sorted by namespace then name
pub fn latest_per_release(releases: Vec<Release>) -> Vec<Release> {
    let mut latest: HashMap<(String, String), Release> = HashMap::new();
    for release in releases {
        let key = (release.namespace.clone(), release.name.clone());
        match latest.get(&key) {
            Some(existing) if existing.revision >= release.revision => {}
            _ => {
                latest.insert(key, release);
            }
        }
    }

    let mut releases: Vec<Release> = latest.into_values().collect();
    releases.sort_by(|a, b| (&a.namespace, &a.name).cmp(&(&b.namespace, &b.name)));
    releases
}
