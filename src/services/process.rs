//! Fire-and-forget child processes

use crate::{MedibotError, Result};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Spawn `argv` with null stdio and reap it on a background thread
///
/// The caller never waits; the returned handle yields the exit status once
/// the child has exited, or `None` if waiting failed.
pub(crate) fn spawn_detached(argv: &[String]) -> Result<JoinHandle<Option<ExitStatus>>> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| MedibotError::LaunchError("Empty command line".to_string()))?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| MedibotError::LaunchError(format!("{}: {}", program, e)))?;

    let name = program.clone();
    thread::Builder::new()
        .name("medibot-reaper".to_string())
        .spawn(move || match child.wait() {
            Ok(status) => {
                debug!("{} exited with {}", name, status);
                Some(status)
            }
            Err(e) => {
                warn!("Failed to wait for {}: {}", name, e);
                None
            }
        })
        .map_err(|e| MedibotError::LaunchError(format!("Failed to spawn reaper thread: {}", e)))
}
