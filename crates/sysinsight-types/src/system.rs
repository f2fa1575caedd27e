use serde::{Deserialize, Serialize};

use crate::ErrorBody;

/// Result of one call to the collector: either every domain was attempted,
/// or setup failed before any domain could be read.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Snapshot {
    Complete(SystemSnapshot),
    Failed(ErrorBody),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SystemSnapshot {
    pub system: Domain<SystemIdentity>,
    pub cpu: Domain<CpuMetrics>,
    pub memory: Domain<MemoryMetrics>,
    pub disk: Domain<DiskMetrics>,
    pub processes: Vec<ProcessEntry>,
    pub network: Vec<ConnectionEntry>,
}

/// A domain value, or the error that replaced it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Domain<T> {
    Failed(DomainFailure),
    Reported(T),
}

/// `percent` is only present for domains whose consumers read a percentage,
/// so a failed gauge still renders as 0.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DomainFailure {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<u32>,
}

impl DomainFailure {
    pub fn bare(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            percent: None,
        }
    }

    pub fn gauge(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            percent: Some(0),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SystemIdentity {
    pub platform: String,
    pub platform_release: String,
    pub platform_version: String,
    pub hostname: String,
    pub boot_time: String,
    pub uptime: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CpuMetrics {
    pub percent: f64,
    pub cores: u64,
    pub logical_cores: u64,
    /// MHz.
    pub frequency: f64,
    pub vendor: String,
    pub model: String,
}

/// Sizes are GiB rounded to two decimals.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MemoryMetrics {
    pub percent: f64,
    pub total: f64,
    pub used: f64,
    pub available: f64,
}

/// Usage of the root filesystem; sizes are GiB rounded to two decimals.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DiskMetrics {
    pub percent: f64,
    pub total: f64,
    pub used: f64,
    pub free: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConnectionEntry {
    pub local_address: String,
    pub remote_address: String,
    pub status: String,
    pub pid: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gauge_failure_carries_zero_percent() {
        let domain: Domain<CpuMetrics> = Domain::Failed(DomainFailure::gauge("sensor gone"));
        let value = serde_json::to_value(&domain).unwrap();
        assert_eq!(value, json!({"error": "sensor gone", "percent": 0}));
    }

    #[test]
    fn bare_failure_has_only_error() {
        let domain: Domain<SystemIdentity> = Domain::Failed(DomainFailure::bare("uname failed"));
        let value = serde_json::to_value(&domain).unwrap();
        assert_eq!(value, json!({"error": "uname failed"}));
    }

    #[test]
    fn reported_domain_serializes_flat() {
        let domain = Domain::Reported(MemoryMetrics {
            percent: 41.5,
            total: 2.0,
            used: 0.83,
            available: 1.17,
        });
        let value = serde_json::to_value(&domain).unwrap();
        assert_eq!(
            value,
            json!({"percent": 41.5, "total": 2.0, "used": 0.83, "available": 1.17})
        );
    }

    #[test]
    fn failed_snapshot_is_single_error_object() {
        let snapshot = Snapshot::Failed(ErrorBody::new("clock went backwards"));
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value, json!({"error": "clock went backwards"}));
    }

    #[test]
    fn failure_round_trips_through_untagged_domain() {
        let parsed: Domain<DiskMetrics> =
            serde_json::from_value(json!({"error": "statvfs failed", "percent": 0})).unwrap();
        assert_eq!(parsed, Domain::Failed(DomainFailure::gauge("statvfs failed")));
    }
}
