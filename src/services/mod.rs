//! External capabilities the dispatcher calls into
//!
//! Each collaborator is a narrow trait so the session can run against the
//! real system or against scripted doubles in tests.

pub mod browser;
pub mod jokes;
pub mod power;
mod process;
pub mod wikipedia;

pub use browser::SystemBrowser;
pub use jokes::JokeBook;
pub use power::SystemPower;
pub use wikipedia::{LookupError, WikipediaClient, WikipediaConfig};

use crate::Result;
use chrono::{Local, NaiveTime};

/// Encyclopedia summaries
pub trait LookupService {
    fn summarize(&self, query: &str, max_sentences: usize) -> std::result::Result<String, LookupError>;
}

/// Source of jokes; assumed never to fail
pub trait JokeService {
    fn joke(&self) -> String;
}

/// Opens a URL in the user's browser without waiting for it
pub trait BrowserLauncher {
    fn open(&self, url: &str) -> Result<()>;
}

/// Operating-system power state
pub trait PowerControl {
    fn hibernate(&self) -> Result<()>;
}

/// Wall-clock time source
pub trait Clock {
    fn now(&self) -> NaiveTime;
}

/// The local system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}
