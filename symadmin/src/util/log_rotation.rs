// This file is part of symadmin.
// SPDX-FileCopyrightText: 2025-2026 The symadmin contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Append-only activity log with size-based rotation.
//!
//! Writes are funnelled through a single background thread so the log can be
//! shared by every actix worker. When a write would push the file past
//! `max_size_bytes`, the current file is either gzip-archived next to it
//! (`main.log.<timestamp>.gz`) or discarded, and a fresh file is started.

use chrono::Utc;
use flate2::{Compression, write::GzEncoder};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

const LOG_BANNER_TITLE: &str = "Symphony Log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityLogSettings {
    /// 0 disables rotation.
    pub max_size_bytes: u64,
    pub archive: bool,
    pub echo_to_stderr: bool,
}

impl ActivityLogSettings {
    pub fn from_config(log: &crate::config::LogConfig) -> Self {
        Self {
            max_size_bytes: log.maxsize,
            archive: log.archive,
            echo_to_stderr: false,
        }
    }
}

#[derive(Clone)]
pub struct ActivityLogWriter {
    sender: mpsc::Sender<LogWriterCommand>,
}

struct ActivityLogInner {
    path: PathBuf,
    settings: ActivityLogSettings,
    file: fs::File,
    size: u64,
}

enum LogWriterCommand {
    Write {
        bytes: Vec<u8>,
        reply: mpsc::Sender<io::Result<usize>>,
    },
    Flush {
        reply: mpsc::Sender<io::Result<()>>,
    },
    UpdateSettings {
        settings: ActivityLogSettings,
        reply: mpsc::Sender<io::Result<()>>,
    },
}

impl ActivityLogWriter {
    pub fn new(path: PathBuf, settings: ActivityLogSettings) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let (file, size) = open_log_file(&path)?;
        let mut inner = ActivityLogInner {
            path,
            settings,
            file,
            size,
        };
        if inner.size == 0 {
            inner.write_banner()?;
        }
        let sender = start_log_writer(inner)?;
        Ok(Self { sender })
    }

    pub fn update_settings(&self, settings: ActivityLogSettings) -> io::Result<()> {
        self.request(|reply| LogWriterCommand::UpdateSettings { settings, reply })
    }

    fn request<T>(
        &self,
        build: impl FnOnce(mpsc::Sender<io::Result<T>>) -> LogWriterCommand,
    ) -> io::Result<T> {
        let (reply, receive) = mpsc::channel();
        self.sender
            .send(build(reply))
            .map_err(|_| io::Error::other("Log writer channel closed"))?;
        match receive.recv() {
            Ok(result) => result,
            Err(_) => Err(io::Error::other("Log writer channel closed")),
        }
    }
}

impl Write for ActivityLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.request(|reply| LogWriterCommand::Write {
            bytes: buf.to_vec(),
            reply,
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.request(|reply| LogWriterCommand::Flush { reply })
    }
}

impl ActivityLogInner {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.rotate_if_needed(buf.len() as u64)?;
        self.file.write_all(buf)?;
        self.size = self.size.saturating_add(buf.len() as u64);
        if self.settings.echo_to_stderr {
            let _ = io::stderr().write_all(buf);
        }
        Ok(buf.len())
    }

    fn write_banner(&mut self) -> io::Result<()> {
        let banner = format!(
            "{}\n{}\nOpened: {}\n{}\n",
            "=".repeat(40),
            LOG_BANNER_TITLE,
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            "=".repeat(40)
        );
        self.file.write_all(banner.as_bytes())?;
        self.size = self.size.saturating_add(banner.len() as u64);
        Ok(())
    }

    fn rotate_if_needed(&mut self, incoming: u64) -> io::Result<()> {
        if self.settings.max_size_bytes == 0 {
            return Ok(());
        }
        if self.size > 0 && self.size.saturating_add(incoming) > self.settings.max_size_bytes {
            self.rotate()?;
        }
        Ok(())
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.settings.archive {
            archive_log_file(&self.path)?;
        }
        fs::File::create(&self.path)?;
        self.file = reopen_for_append(&self.path)?;
        self.size = 0;
        self.write_banner()
    }
}

fn start_log_writer(inner: ActivityLogInner) -> io::Result<mpsc::Sender<LogWriterCommand>> {
    let (sender, receiver) = mpsc::channel();
    let thread = thread::Builder::new().name("activity-log".to_string());
    thread
        .spawn(move || run_log_writer(receiver, inner))
        .map_err(|err| io::Error::other(format!("Log writer worker failed to start: {}", err)))?;
    Ok(sender)
}

fn run_log_writer(receiver: mpsc::Receiver<LogWriterCommand>, mut inner: ActivityLogInner) {
    while let Ok(command) = receiver.recv() {
        match command {
            LogWriterCommand::Write { bytes, reply } => {
                let _ = reply.send(inner.write(&bytes));
            }
            LogWriterCommand::Flush { reply } => {
                let _ = reply.send(inner.file.flush());
            }
            LogWriterCommand::UpdateSettings { settings, reply } => {
                inner.settings = settings;
                let _ = reply.send(Ok(()));
            }
        }
    }
}

/// Compresses `path` into `<path>.<timestamp>.gz`, picking a free name.
fn archive_log_file(path: &Path) -> io::Result<PathBuf> {
    let stamp = Utc::now().format("%Y%m%d%H%M%S").to_string();
    let mut target = archive_path(path, &stamp, 0);
    let mut attempt = 1;
    while target.exists() {
        target = archive_path(path, &stamp, attempt);
        attempt += 1;
    }

    let content = fs::read(path)?;
    let mut encoder = GzEncoder::new(fs::File::create(&target)?, Compression::default());
    encoder.write_all(&content)?;
    encoder.finish()?.sync_all()?;
    Ok(target)
}

fn archive_path(path: &Path, stamp: &str, attempt: u32) -> PathBuf {
    let base = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = if attempt == 0 {
        format!("{}.{}.gz", base, stamp)
    } else {
        format!("{}.{}-{}.gz", base, stamp, attempt)
    };
    path.with_file_name(name)
}

fn open_log_file(path: &Path) -> io::Result<(fs::File, u64)> {
    let file = reopen_for_append(path)?;
    let size = file.metadata().map(|meta| meta.len()).unwrap_or(0);
    Ok((file, size))
}

fn reopen_for_append(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_fixtures::TestFixtureRoot;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn archives_in(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "gz"))
            .collect()
    }

    #[test]
    fn new_log_starts_with_banner() {
        let fixture = TestFixtureRoot::new_unique("activity-log-banner").unwrap();
        let path = fixture.path().join("logs").join("main.log");
        let mut writer = ActivityLogWriter::new(
            path.clone(),
            ActivityLogSettings {
                max_size_bytes: 0,
                archive: false,
                echo_to_stderr: false,
            },
        )
        .expect("writer");
        writer.write_all(b"first entry\n").unwrap();
        writer.flush().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains(LOG_BANNER_TITLE));
        assert!(content.ends_with("first entry\n"));
    }

    #[test]
    fn rotation_archives_previous_content() {
        let fixture = TestFixtureRoot::new_unique("activity-log-archive").unwrap();
        let log_dir = fixture.path().join("logs");
        let path = log_dir.join("main.log");
        let mut writer = ActivityLogWriter::new(
            path.clone(),
            ActivityLogSettings {
                max_size_bytes: 512,
                archive: true,
                echo_to_stderr: false,
            },
        )
        .expect("writer");

        writer.write_all(&[b'a'; 300]).unwrap();
        writer.write_all(&[b'b'; 300]).unwrap();
        writer.flush().unwrap();

        let archives = archives_in(&log_dir);
        assert_eq!(archives.len(), 1);
        let mut decoded = String::new();
        GzDecoder::new(fs::File::open(&archives[0]).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert!(decoded.contains(&"a".repeat(300)));

        let current = fs::read_to_string(&path).unwrap();
        assert!(current.contains(&"b".repeat(300)));
        assert!(!current.contains(&"a".repeat(300)));
    }

    #[test]
    fn rotation_without_archive_discards_content() {
        let fixture = TestFixtureRoot::new_unique("activity-log-truncate").unwrap();
        let log_dir = fixture.path().join("logs");
        let path = log_dir.join("main.log");
        let mut writer = ActivityLogWriter::new(
            path.clone(),
            ActivityLogSettings {
                max_size_bytes: 256,
                archive: false,
                echo_to_stderr: false,
            },
        )
        .expect("writer");

        writer.write_all(&[b'x'; 200]).unwrap();
        writer.write_all(&[b'y'; 200]).unwrap();
        writer.flush().unwrap();

        assert!(archives_in(&log_dir).is_empty());
        let current = fs::read_to_string(&path).unwrap();
        assert!(!current.contains('x'));
        assert!(current.contains(&"y".repeat(200)));
    }
}
