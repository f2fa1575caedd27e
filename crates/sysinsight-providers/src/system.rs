use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Local, TimeZone};
use sysinsight_types::{Domain, DomainFailure, SystemIdentity};
use tracing::{debug, warn};

use crate::error::ProbeError;
use crate::probe::{HostProbe, RawIdentity};

pub fn collect(probe: &mut impl HostProbe) -> Domain<SystemIdentity> {
    match probe.identity().and_then(from_raw) {
        Ok(identity) => {
            debug!("system identity collected for {}", identity.hostname);
            Domain::Reported(identity)
        }
        Err(e) => {
            warn!("system identity unavailable: {e}");
            Domain::Failed(DomainFailure::bare(e.to_string()))
        }
    }
}

pub fn from_raw(raw: RawIdentity) -> Result<SystemIdentity, ProbeError> {
    Ok(SystemIdentity {
        platform: raw.platform,
        platform_release: raw.release,
        platform_version: raw.version,
        hostname: raw.hostname,
        boot_time: iso_local(raw.boot_secs)?,
        uptime: raw.now_secs.saturating_sub(raw.boot_secs),
    })
}

/// Local wall-clock time without offset, e.g. `2024-03-01T08:15:42`.
fn iso_local(epochSecs: u64) -> Result<String, ProbeError> {
    let secs = i64::try_from(epochSecs)
        .map_err(|_| ProbeError::Unavailable(format!("boot time {epochSecs} out of range")))?;
    Local
        .timestamp_opt(secs, 0)
        .earliest()
        .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string())
        .ok_or_else(|| ProbeError::Unavailable(format!("boot time {epochSecs} is not a valid local time")))
}

pub(crate) fn now_secs() -> Result<u64, ProbeError> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

pub(crate) fn read_identity() -> Result<RawIdentity, ProbeError> {
    let uts = nix::sys::utsname::uname().map_err(|e| ProbeError::os("uname", e))?;
    let hostname = nix::unistd::gethostname().map_err(|e| ProbeError::os("gethostname", e))?;

    let bootSecs = sysinfo::System::boot_time();
    if bootSecs == 0 {
        return Err(ProbeError::Unavailable("boot time not reported by the OS".into()));
    }

    Ok(RawIdentity {
        platform: uts.sysname().to_string_lossy().into_owned(),
        release: uts.release().to_string_lossy().into_owned(),
        version: uts.version().to_string_lossy().into_owned(),
        hostname: hostname.to_string_lossy().into_owned(),
        boot_secs: bootSecs,
        now_secs: now_secs()?,
    })
}
