//! Process and host information used to stamp structured log records.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use hostname::get;
use local_ip_address::local_ip;
use thiserror::Error;

/// Errors raised while collecting process information.
#[derive(Debug, Error)]
pub enum ProcessInfoError {
    /// An I/O error occurred, typically while resolving the executable path.
    #[error("I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    /// The hostname or IP could not be determined.
    #[error("Host lookup failed: {0}")]
    HostLookup(String),
}

/// Information about the current running process and its environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    /// The full path to the current executable.
    pub process_current_exe: String,
    /// The base name of the executable (filename without extension).
    pub process_basename: String,
    /// The directory where the executable is located.
    pub process_location: String,
    /// The process ID (PID) of the current process.
    pub process_pid: i64,
    /// The user name of the user running the process.
    pub process_user: String,
    /// The hostname of the machine running the process.
    pub process_host: String,
    /// The local IP address of the machine running the process.
    pub process_host_ip: String,
}

/// Collects information about the current process.
///
/// Host name and IP failures are tolerated with placeholder values so
/// logging never becomes the reason a service cannot start.
pub fn get_process_info() -> Result<ProcessInfo, ProcessInfoError> {
    let current_exe: PathBuf = env::current_exe()?;

    let basename = current_exe
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string());

    let location = current_exe
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string());

    let user = env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string());

    let host_ip = local_ip()
        .map(|ip| ip.to_string())
        .unwrap_or_else(|_| "0.0.0.0".to_string());

    Ok(ProcessInfo {
        process_current_exe: current_exe.to_string_lossy().into_owned(),
        process_basename: basename,
        process_location: location,
        process_pid: std::process::id() as i64,
        process_user: user,
        process_host: host,
        process_host_ip: host_ip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_info_resolves_for_the_test_binary() {
        let info = get_process_info().expect("process info");
        assert!(!info.process_basename.is_empty());
        assert!(info.process_pid > 0);
    }
}
