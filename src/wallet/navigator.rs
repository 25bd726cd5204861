use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use log::{debug, info};
use url::Url;

use super::provider::Navigator;
use crate::{Error, Result};

/// Opens URLs with the platform's default opener
#[derive(Debug, Default, Clone)]
pub struct SystemNavigator;

impl SystemNavigator {
    pub fn new() -> Self {
        Self
    }

    fn opener() -> Option<(PathBuf, Vec<&'static str>)> {
        if cfg!(target_os = "windows") {
            return which::which("cmd").ok().map(|cmd| (cmd, vec!["/C", "start", ""]));
        }
        ["xdg-open", "open"].iter().find_map(|name| which::which(name).ok().map(|p| (p, vec![])))
    }
}

impl Navigator for SystemNavigator {
    fn open(&self, url: &str) -> Result<()> {
        let url = Url::parse(url).map_err(|e| Error::Other(format!("Invalid URL {}: {}", url, e)))?;
        let (program, args) =
            Self::opener().ok_or_else(|| Error::Other("no URL opener found on PATH".to_string()))?;

        info!("opening {}", url);
        let mut command = Command::new(program);
        command.args(args).arg(url.as_str());
        spawn_detached(&mut command)?;
        Ok(())
    }
}

/// Spawn `command` with null stdio and reap it on a background thread
fn spawn_detached(command: &mut Command) -> Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child =
        command.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null()).spawn()?;
    let handle = thread::spawn(move || {
        let status = child.wait();
        debug!("opener exited with {:?}", status);
        status
    });
    Ok(handle)
}

/// Navigator that only logs the URL, for headless runs
#[derive(Debug, Default, Clone)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn open(&self, url: &str) -> Result<()> {
        info!("install a wallet from {}", url);
        Ok(())
    }
}
