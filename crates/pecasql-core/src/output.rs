use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};
use crate::model::SqlStatement;

/// File name used when the caller does not pick one.
pub const DEFAULT_OUTPUT_FILE: &str = "atualizar_CTE_peca.sql";
/// Characters shown in a preview by default.
pub const DEFAULT_PREVIEW_CHARS: usize = 3000;

/// Join statements in order, each ending with a newline and separated by a
/// blank line.
pub fn join_statements(statements: &[SqlStatement]) -> String {
    statements
        .iter()
        .map(|statement| format!("{statement}\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First `max_chars` characters of `text`, cut on a character boundary.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Persist `text` to `path` as a whole: either the complete file replaces the
/// target or the target is left untouched.
pub fn write_output(path: &Path, text: &str) -> Result<u64> {
    write_bytes_atomic(path, text.as_bytes()).map_err(|source| PipelineError::IoWrite {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(event = "output_written", path = %path.display(), bytes = text.len());
    Ok(text.len() as u64)
}

fn write_bytes_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path)?;
    if let Err(err) = write_temp(&tmp_path, data).and_then(|()| std::fs::rename(&tmp_path, path)) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err);
    }

    if let Some(parent) = parent {
        sync_dir(parent)?;
    }
    Ok(())
}

fn write_temp(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    file.write_all(data)?;
    file.sync_all()
}

fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name")
    })?;
    Ok(path.with_file_name(format!("{}.tmp", file_name.to_string_lossy())))
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}
