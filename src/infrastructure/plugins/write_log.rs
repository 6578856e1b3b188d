use crate::infrastructure::{WriteContext, WriteHook};
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;

pub const WRITE_LOG_FILE: &str = "write_log.txt";

/// Appends one line per diary write to `write_log.txt` in the data directory
pub struct WriteLogHook;

impl WriteHook for WriteLogHook {
    fn on_diary_written(&self, context: &WriteContext) -> Result<()> {
        let log_path = context.data_dir.join(WRITE_LOG_FILE);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open {}", log_path.display()))?;

        writeln!(
            file,
            "[{}] Diary '{}' written - Path: {} - Content length: {} bytes",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            context.key,
            context.storage_path.display(),
            context.content.len()
        )?;

        Ok(())
    }

    fn name(&self) -> &str {
        "Write Log"
    }
}
