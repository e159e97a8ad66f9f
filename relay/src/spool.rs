use crate::reading::Reading;
use crate::sink::Sink;
use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Durable local buffer: one JSON reading per line, fsynced on append.
/// Replayed oldest-first and truncated only after the remote store commits.
pub struct Spool {
    path: PathBuf,
    file: File,
}

impl Spool {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating spool directory {}", parent.display()))?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening spool {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    fn append(&mut self, reading: &Reading) -> Result<()> {
        let mut line = serde_json::to_vec(reading)?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        // A spooled reading must survive power loss.
        self.file.sync_data()?;
        Ok(())
    }

    /// Backlog in insertion order. A torn line at the tail (crash mid-append)
    /// is skipped with a warning rather than poisoning the replay.
    pub fn pending(&self) -> Result<Vec<Reading>> {
        let file = File::open(&self.path)
            .with_context(|| format!("reading spool {}", self.path.display()))?;

        let mut readings = Vec::new();
        for (n, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(reading) => readings.push(reading),
                Err(e) => warn!("skipping unreadable spool line {}: {}", n + 1, e),
            }
        }
        Ok(readings)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.file.set_len(0)?;
        self.file.sync_data()?;
        Ok(())
    }
}

impl Sink for Spool {
    async fn store(&mut self, readings: &[Reading]) -> Result<()> {
        for reading in readings {
            self.append(reading)?;
        }
        Ok(())
    }
}
