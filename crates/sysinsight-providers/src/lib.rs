#![allow(non_snake_case)]

pub mod cpu;
pub mod disk;
pub mod error;
pub mod live;
pub mod memory;
pub mod network;
pub mod normalize;
pub mod probe;
pub mod processes;
pub mod system;

pub use error::ProbeError;
pub use live::LiveProbe;
pub use probe::*;

use sysinsight_types::{ErrorBody, Snapshot, SystemSnapshot};
use tracing::{debug, error};

/// Collects a snapshot of this host. Never fails: domain errors are embedded
/// in their domain, setup errors replace the whole snapshot.
///
/// Blocks the calling thread for [`cpu::sample_window`].
pub fn collect() -> Snapshot {
    match LiveProbe::new() {
        Ok(mut probe) => Snapshot::Complete(collect_from(&mut probe)),
        Err(e) => {
            error!("system collection failed before reading any domain: {e}");
            Snapshot::Failed(ErrorBody::new(e.to_string()))
        }
    }
}

/// Reads every domain from `probe`. A failing domain never stops the others.
pub fn collect_from(probe: &mut impl HostProbe) -> SystemSnapshot {
    let snapshot = SystemSnapshot {
        system: system::collect(probe),
        cpu: cpu::collect(probe),
        memory: memory::collect(probe),
        disk: disk::collect(probe),
        processes: processes::collect(probe),
        network: network::collect(probe),
    };
    debug!("system snapshot collected");
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::net::SocketAddr;

    const GIB: u64 = 1024 * 1024 * 1024;

    /// Canned readings; each domain can be switched to fail.
    #[derive(Default)]
    struct FakeProbe {
        failIdentity: bool,
        failCpu: bool,
        failMemory: bool,
        failDisk: bool,
        failProcesses: bool,
        failConnections: bool,
        connections: Vec<RawConnection>,
    }

    fn unavailable(what: &str) -> ProbeError {
        ProbeError::Unavailable(format!("{what} exploded"))
    }

    impl HostProbe for FakeProbe {
        fn identity(&mut self) -> Result<RawIdentity, ProbeError> {
            if self.failIdentity {
                return Err(unavailable("uname"));
            }
            Ok(RawIdentity {
                platform: "Linux".into(),
                release: "6.8.0".into(),
                version: "#1 SMP".into(),
                hostname: "probe-host".into(),
                boot_secs: 1_700_000_000,
                now_secs: 1_700_000_090,
            })
        }

        fn cpu(&mut self) -> Result<RawCpu, ProbeError> {
            if self.failCpu {
                return Err(unavailable("cpu sampler"));
            }
            Ok(RawCpu {
                percent: Some(12.5),
                physical_cores: None,
                logical_cores: Some(4),
                frequency_mhz: Some(2400),
                model: Some("Test CPU".into()),
            })
        }

        fn memory(&mut self) -> Result<RawMemory, ProbeError> {
            if self.failMemory {
                return Err(unavailable("meminfo"));
            }
            Ok(RawMemory {
                total_bytes: 2 * GIB,
                used_bytes: GIB,
                available_bytes: GIB,
            })
        }

        fn disk(&mut self) -> Result<RawDisk, ProbeError> {
            if self.failDisk {
                return Err(unavailable("statvfs"));
            }
            Ok(RawDisk {
                total_bytes: 10 * GIB,
                used_bytes: 4 * GIB,
                free_bytes: 6 * GIB,
            })
        }

        fn processes(&mut self) -> Result<Vec<RawProcess>, ProbeError> {
            if self.failProcesses {
                return Err(unavailable("process table"));
            }
            Ok((1..=15)
                .map(|pid| RawProcess {
                    pid: Some(pid),
                    name: Some(format!("p{pid}")),
                    cpu_percent: Some(pid as f32),
                    memory_percent: Some(0.5),
                })
                .collect())
        }

        fn connections(&mut self) -> Result<Vec<RawConnection>, ProbeError> {
            if self.failConnections {
                return Err(unavailable("tcp table"));
            }
            Ok(self.connections.clone())
        }
    }

    #[test]
    fn every_domain_present_when_healthy() {
        let snapshot = collect_from(&mut FakeProbe::default());
        let value = serde_json::to_value(&snapshot).unwrap();

        for key in ["system", "cpu", "memory", "disk", "processes", "network"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["system"]["uptime"], json!(90));
        assert_eq!(value["cpu"]["cores"], json!(0));
        assert_eq!(value["memory"]["total"], json!(2.0));
        assert_eq!(value["disk"]["percent"], json!(40.0));
        assert_eq!(value["processes"].as_array().unwrap().len(), 10);
        assert_eq!(value["processes"][0]["pid"], json!(15));
        assert_eq!(value["network"], json!([]));
    }

    #[test]
    fn cpu_failure_leaves_other_domains_intact() {
        let mut probe = FakeProbe {
            failCpu: true,
            ..FakeProbe::default()
        };
        let value = serde_json::to_value(collect_from(&mut probe)).unwrap();

        assert_eq!(value["cpu"], json!({"error": "cpu sampler exploded", "percent": 0}));
        assert_eq!(value["system"]["hostname"], json!("probe-host"));
        assert_eq!(value["memory"]["percent"], json!(50.0));
        assert_eq!(value["disk"]["free"], json!(6.0));
        assert_eq!(value["processes"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn every_domain_failing_still_yields_every_key() {
        let mut probe = FakeProbe {
            failIdentity: true,
            failCpu: true,
            failMemory: true,
            failDisk: true,
            failProcesses: true,
            failConnections: true,
            ..FakeProbe::default()
        };
        let value = serde_json::to_value(collect_from(&mut probe)).unwrap();

        assert_eq!(value["system"], json!({"error": "uname exploded"}));
        assert_eq!(value["memory"], json!({"error": "meminfo exploded", "percent": 0}));
        assert_eq!(value["disk"], json!({"error": "statvfs exploded", "percent": 0}));
        assert_eq!(value["processes"], json!([]));
        assert_eq!(value["network"], json!([]));
    }

    #[test]
    fn established_connections_reach_the_snapshot() {
        let local: SocketAddr = "192.168.1.20:51234".parse().unwrap();
        let mut probe = FakeProbe {
            connections: vec![RawConnection {
                local,
                remote: Some("140.82.112.3:443".parse().unwrap()),
                status: network::ESTABLISHED.into(),
                pid: Some(812),
            }],
            ..FakeProbe::default()
        };
        let snapshot = collect_from(&mut probe);

        assert_eq!(snapshot.network.len(), 1);
        assert_eq!(snapshot.network[0].local_address, "192.168.1.20:51234");
        assert_eq!(snapshot.network[0].remote_address, "140.82.112.3:443");
        assert_eq!(snapshot.network[0].pid, 812);
    }
}
