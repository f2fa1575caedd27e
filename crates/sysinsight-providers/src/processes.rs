use sysinfo::{ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System};
use sysinsight_types::ProcessEntry;
use tracing::{debug, warn};

use crate::error::ProbeError;
use crate::normalize::{number, round1};
use crate::probe::{HostProbe, RawProcess};

pub const TOP_PROCESS_LIMIT: usize = 10;

pub fn collect(probe: &mut impl HostProbe) -> Vec<ProcessEntry> {
    match probe.processes() {
        Ok(raw) => {
            let entries = top_by_cpu(raw);
            debug!("process list collected: {} entries", entries.len());
            entries
        }
        Err(e) => {
            warn!("process list unavailable: {e}");
            Vec::new()
        }
    }
}

/// Drops entries without a pid or name, then keeps the busiest
/// [`TOP_PROCESS_LIMIT`] by CPU. CPU is reported to one decimal and ties
/// keep their enumeration order.
pub fn top_by_cpu(raw: Vec<RawProcess>) -> Vec<ProcessEntry> {
    let mut entries: Vec<ProcessEntry> = raw
        .into_iter()
        .filter_map(|process| {
            let (Some(pid), Some(name)) = (process.pid, process.name) else {
                debug!("skipping process without readable pid or name");
                return None;
            };
            if name.is_empty() {
                debug!("skipping pid {pid} with empty name");
                return None;
            }
            Some(ProcessEntry {
                pid,
                name,
                cpu_percent: round1(number(process.cpu_percent)),
                memory_percent: number(process.memory_percent),
            })
        })
        .collect();

    entries.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
    entries.truncate(TOP_PROCESS_LIMIT);
    entries
}

/// Zombies and dead processes have already exited; they are not reported.
pub fn is_live(status: ProcessStatus) -> bool {
    !matches!(status, ProcessStatus::Zombie | ProcessStatus::Dead)
}

pub(crate) fn refresh(sys: &mut System) {
    sys.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing().with_cpu().with_memory(),
    );
}

/// Reads the process table as of the last [`refresh`], skipping exited
/// processes.
pub(crate) fn read(sys: &System) -> Result<Vec<RawProcess>, ProbeError> {
    let totalMemory = sys.total_memory();

    let mut processes: Vec<RawProcess> = sys
        .processes()
        .iter()
        .filter_map(|(pid, process)| {
            if !is_live(process.status()) {
                debug!("skipping exited pid {pid} ({})", process.status());
                return None;
            }
            let name = process.name().to_string_lossy();
            let memoryPercent = (totalMemory > 0)
                .then(|| process.memory() as f64 / totalMemory as f64 * 100.0);
            Some(RawProcess {
                pid: Some(pid.as_u32()),
                name: (!name.is_empty()).then(|| name.into_owned()),
                cpu_percent: Some(process.cpu_usage()),
                memory_percent: memoryPercent,
            })
        })
        .collect();

    if processes.is_empty() {
        return Err(ProbeError::Unavailable("process table is empty".into()));
    }

    processes.sort_by_key(|p| p.pid);
    Ok(processes)
}
