//! CSV table writers.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use csv::{Writer as CsvWriter, WriterBuilder};

use crate::error::{Result, StorageError};
use crate::rows::CsvRow;

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(StorageError::io(parent))?;
    }
    Ok(())
}

fn write_rows<R: CsvRow>(
    writer: &mut CsvWriter<File>,
    path: &Path,
    rows: impl IntoIterator<Item = R>,
    with_header: bool,
) -> Result<usize> {
    if with_header {
        writer
            .write_record(R::header())
            .map_err(StorageError::csv(path))?;
    }
    let mut written = 0;
    for row in rows {
        writer
            .write_record(row.fields())
            .map_err(StorageError::csv(path))?;
        written += 1;
    }
    writer.flush().map_err(StorageError::io(path))?;
    Ok(written)
}

/// Write a complete table, replacing any existing file. Returns the row count.
pub fn write_table<R: CsvRow>(path: &Path, rows: impl IntoIterator<Item = R>) -> Result<usize> {
    create_parent(path)?;
    let file = File::create(path).map_err(StorageError::io(path))?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    write_rows(&mut writer, path, rows, true)
}

/// Append rows, writing the header only when the file is new or empty.
pub fn append_rows<R: CsvRow>(path: &Path, rows: impl IntoIterator<Item = R>) -> Result<usize> {
    create_parent(path)?;
    let with_header = fs::metadata(path).map(|meta| meta.len() == 0).unwrap_or(true);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(StorageError::io(path))?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    write_rows(&mut writer, path, rows, with_header)
}

/// Remove a table if it exists, so a rerun starts from a clean file.
pub fn remove_table(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(StorageError::io(path)(err)),
    }
}
