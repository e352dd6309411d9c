use super::process::spawn_detached;
use super::PowerControl;
use crate::Result;
use tracing::info;

/// Puts the machine into hibernation with the platform's power command
#[derive(Debug, Clone, Default)]
pub struct SystemPower {
    /// Replaces the platform default when set
    command: Option<Vec<String>>,
}

impl SystemPower {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom hibernate command line; an empty list keeps the default
    pub fn with_command(command: Vec<String>) -> Self {
        Self {
            command: (!command.is_empty()).then_some(command),
        }
    }

    pub fn command(&self) -> Vec<String> {
        self.command.clone().unwrap_or_else(default_hibernate_command)
    }
}

fn default_hibernate_command() -> Vec<String> {
    let argv: &[&str] = if cfg!(target_os = "windows") {
        &["shutdown", "/h"]
    } else if cfg!(target_os = "macos") {
        &["pmset", "sleepnow"]
    } else {
        &["systemctl", "hibernate"]
    };
    argv.iter().map(|arg| arg.to_string()).collect()
}

impl PowerControl for SystemPower {
    fn hibernate(&self) -> Result<()> {
        let argv = self.command();
        info!("Requesting hibernate: {:?}", argv);

        spawn_detached(&argv)?;
        Ok(())
    }
}
