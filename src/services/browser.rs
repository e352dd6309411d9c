use super::process::spawn_detached;
use super::BrowserLauncher;
use crate::Result;
use tracing::debug;

/// Opens URLs with the platform's default handler
#[derive(Debug, Clone, Default)]
pub struct SystemBrowser;

impl SystemBrowser {
    pub fn new() -> Self {
        Self
    }
}

/// Command line that hands a URL to the desktop's opener
pub(crate) fn opener_command(url: &str) -> Vec<String> {
    if cfg!(target_os = "windows") {
        vec!["cmd".into(), "/C".into(), "start".into(), String::new(), url.into()]
    } else if cfg!(target_os = "macos") {
        vec!["open".into(), url.into()]
    } else {
        vec!["xdg-open".into(), url.into()]
    }
}

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        let argv = opener_command(url);
        debug!("Launching browser: {:?}", argv);

        // The opener exits on its own; the reaper collects it
        spawn_detached(&argv)?;
        Ok(())
    }
}
