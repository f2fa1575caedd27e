use std::collections::{HashMap, HashSet};
use std::fs;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use sysinsight_types::ConnectionEntry;
use tracing::{debug, warn};

use crate::error::ProbeError;
use crate::normalize::or_zero;
use crate::probe::{HostProbe, RawConnection};

pub const CONNECTION_LIMIT: usize = 10;
pub const ESTABLISHED: &str = "ESTABLISHED";

const TCP4_TABLE: &str = "/proc/net/tcp";
const TCP6_TABLE: &str = "/proc/net/tcp6";

pub fn collect(probe: &mut impl HostProbe) -> Vec<ConnectionEntry> {
    match probe.connections() {
        Ok(raw) => {
            let entries = established(raw);
            debug!("network connections collected: {} established", entries.len());
            entries
        }
        Err(e) => {
            warn!("network connections unavailable: {e}");
            Vec::new()
        }
    }
}

/// Keeps established connections that have a peer, in table order, capped
/// at [`CONNECTION_LIMIT`].
pub fn established(raw: Vec<RawConnection>) -> Vec<ConnectionEntry> {
    raw.into_iter()
        .filter(|conn| conn.status == ESTABLISHED)
        .filter_map(|conn| {
            let remote = conn.remote?;
            Some(ConnectionEntry {
                local_address: endpoint(&conn.local),
                remote_address: endpoint(&remote),
                status: conn.status,
                pid: or_zero(conn.pid),
            })
        })
        .take(CONNECTION_LIMIT)
        .collect()
}

/// `ip:port`, without brackets around IPv6 addresses.
pub fn endpoint(addr: &SocketAddr) -> String {
    format!("{}:{}", addr.ip(), addr.port())
}

/// Kernel TCP state codes as printed in `/proc/net/tcp`.
pub fn tcp_state_name(code: u8) -> &'static str {
    match code {
        0x01 => ESTABLISHED,
        0x02 => "SYN_SENT",
        0x03 => "SYN_RECV",
        0x04 => "FIN_WAIT1",
        0x05 => "FIN_WAIT2",
        0x06 => "TIME_WAIT",
        0x07 => "CLOSE",
        0x08 => "CLOSE_WAIT",
        0x09 => "LAST_ACK",
        0x0A => "LISTEN",
        0x0B => "CLOSING",
        _ => "NONE",
    }
}

/// One row of `/proc/net/tcp` or `/proc/net/tcp6`.
#[derive(Clone, Debug, PartialEq)]
pub struct TcpRow {
    pub local: SocketAddr,
    pub remote: SocketAddr,
    pub state: u8,
    pub inode: u64,
}

impl TcpRow {
    pub fn into_raw(self, owners: &HashMap<u64, u32>) -> RawConnection {
        let hasPeer = !(self.remote.ip().is_unspecified() && self.remote.port() == 0);
        RawConnection {
            local: self.local,
            remote: hasPeer.then_some(self.remote),
            status: tcp_state_name(self.state).to_string(),
            pid: owners.get(&self.inode).copied(),
        }
    }
}

pub fn parse_tcp_row(line: &str) -> Result<TcpRow, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 10 {
        return Err(format!("short tcp table row: {line}"));
    }

    let state = u8::from_str_radix(fields[3], 16)
        .map_err(|e| format!("bad tcp state {}: {e}", fields[3]))?;
    let inode = fields[9]
        .parse::<u64>()
        .map_err(|e| format!("bad socket inode {}: {e}", fields[9]))?;

    Ok(TcpRow {
        local: parse_hex_endpoint(fields[1])?,
        remote: parse_hex_endpoint(fields[2])?,
        state,
        inode,
    })
}

/// Parses `0100007F:1F40` (IPv4) or the 32-digit IPv6 form. Address words are
/// printed in host byte order, the port in network order.
fn parse_hex_endpoint(field: &str) -> Result<SocketAddr, String> {
    if !field.is_ascii() {
        return Err(format!("non-hex endpoint {field}"));
    }
    let (hexAddr, hexPort) = field
        .split_once(':')
        .ok_or_else(|| format!("missing port in {field}"))?;
    let port = u16::from_str_radix(hexPort, 16).map_err(|e| format!("bad port {hexPort}: {e}"))?;

    let ip = match hexAddr.len() {
        8 => IpAddr::V4(Ipv4Addr::from(hex_word(hexAddr)?.to_ne_bytes())),
        32 => {
            let mut octets = [0u8; 16];
            for (i, chunk) in octets.chunks_mut(4).enumerate() {
                chunk.copy_from_slice(&hex_word(&hexAddr[i * 8..i * 8 + 8])?.to_ne_bytes());
            }
            IpAddr::V6(Ipv6Addr::from(octets))
        }
        n => return Err(format!("unexpected address width {n} in {field}")),
    };

    Ok(SocketAddr::new(ip, port))
}

fn hex_word(hex: &str) -> Result<u32, String> {
    u32::from_str_radix(hex, 16).map_err(|e| format!("bad address word {hex}: {e}"))
}

fn parse_table(contents: &str, path: &str) -> Vec<TcpRow> {
    contents
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_tcp_row(line) {
            Ok(row) => Some(row),
            Err(e) => {
                debug!("skipping row in {path}: {e}");
                None
            }
        })
        .collect()
}

/// Maps socket inodes to the pid holding them by walking `/proc/<pid>/fd`.
/// Processes that vanish or deny access are skipped.
fn socket_owners(wanted: &HashSet<u64>) -> HashMap<u64, u32> {
    let mut owners = HashMap::new();
    let Ok(procDir) = fs::read_dir("/proc") else {
        return owners;
    };

    for entry in procDir.flatten() {
        let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse::<u32>().ok()) else {
            continue;
        };
        let Ok(fds) = fs::read_dir(entry.path().join("fd")) else {
            continue;
        };
        for fd in fds.flatten() {
            let Ok(target) = fs::read_link(fd.path()) else {
                continue;
            };
            let inode = target
                .to_str()
                .and_then(|t| t.strip_prefix("socket:["))
                .and_then(|t| t.strip_suffix(']'))
                .and_then(|t| t.parse::<u64>().ok());
            if let Some(inode) = inode {
                if wanted.contains(&inode) {
                    owners.entry(inode).or_insert(pid);
                }
            }
        }
        if owners.len() == wanted.len() {
            break;
        }
    }

    owners
}

pub(crate) fn read_connections() -> Result<Vec<RawConnection>, ProbeError> {
    let v4 = fs::read_to_string(TCP4_TABLE).map_err(|e| ProbeError::io(TCP4_TABLE, e))?;
    let v6 = match fs::read_to_string(TCP6_TABLE) {
        Ok(contents) => Some(contents),
        Err(e) => {
            debug!("{TCP6_TABLE} unavailable, IPv4 only: {e}");
            None
        }
    };

    connections_from_tables(Some(&v4), v6.as_deref(), socket_owners)
}

/// Builds the connection list from the v4 and v6 table contents. The v4
/// table is required; the v6 table is absent when IPv6 is disabled.
/// `owners` is only consulted when some established socket needs a pid.
pub fn connections_from_tables(
    v4: Option<&str>,
    v6: Option<&str>,
    owners: impl FnOnce(&HashSet<u64>) -> HashMap<u64, u32>,
) -> Result<Vec<RawConnection>, ProbeError> {
    let v4 = v4.ok_or_else(|| ProbeError::Unavailable(format!("{TCP4_TABLE} is not readable")))?;
    let mut rows = parse_table(v4, TCP4_TABLE);
    if let Some(v6) = v6 {
        rows.extend(parse_table(v6, TCP6_TABLE));
    }

    let wanted: HashSet<u64> = rows
        .iter()
        .filter(|row| row.state == 0x01 && row.inode != 0)
        .map(|row| row.inode)
        .collect();
    let owners = if wanted.is_empty() {
        HashMap::new()
    } else {
        owners(&wanted)
    };

    Ok(rows.into_iter().map(|row| row.into_raw(&owners)).collect())
}
