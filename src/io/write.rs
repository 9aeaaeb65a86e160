use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Write-then-rename wrapper for atomic file outputs.
pub(crate) struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl PendingWrite {
    /// Open a temporary file next to `target`, creating parent directories as needed.
    pub(crate) fn open(target: &Path) -> Result<Self> {
        let parent = match target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
        let tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("create temp file in {}", parent.display()))?;

        Ok(Self { target: target.to_path_buf(), tmp })
    }

    /// Flush and rename the temporary file over the target.
    pub(crate) fn finish(self) -> Result<()> {
        let Self { target, mut tmp } = self;
        tmp.flush().context("flush temp file")?;
        tmp.as_file().sync_all().ok(); // best-effort fsync file
        tmp.persist(&target)
            .with_context(|| format!("rename to {}", target.display()))?;
        if let Some(dir) = target.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        Ok(())
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.tmp.write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.tmp.flush()
    }
}
