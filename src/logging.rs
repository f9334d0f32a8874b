//! File based logging
//!
//! The server speaks LSP over stdio, so nothing may be printed to stdout.
//! All `log` output goes to a single file under the platform's local data
//! directory, truncated on every start so the file always holds exactly one
//! session.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

struct FileLogger {
    file: Mutex<std::fs::File>,
}

impl FileLogger {
    fn create(path: PathBuf) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(FileLogger {
            file: Mutex::new(file),
        })
    }
}

impl Log for FileLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(
                file,
                "[{}] [{}] {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.args()
            );
            let _ = file.flush();
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

fn log_file_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let data_dir =
        dirs::data_local_dir().ok_or("could not determine local data directory")?;
    Ok(data_dir.join("CssNavigation").join("css_navigation.log"))
}

/// Install the file logger as the global `log` backend.
pub fn init_logger() -> Result<(), Box<dyn std::error::Error>> {
    let logger = FileLogger::create(log_file_path()?)?;
    log::set_boxed_logger(Box::new(logger)).map(|()| log::set_max_level(LevelFilter::Info))?;
    Ok(())
}
