//! Zip archiving of single files, file lists and directory trees.
//!
//! Archives are always written into an explicit output directory and named
//! after their first input: `notes.txt` becomes `notes.txt.zip`, a directory
//! `machines/` becomes `machines.zip`.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{StoreError, StoreResult};

/// Archive a single file into `out_dir`.
pub fn archive_file(path: impl AsRef<Path>, out_dir: impl AsRef<Path>) -> StoreResult<PathBuf> {
    archive_files(&[path.as_ref()], out_dir)
}

/// Archive `paths` into one zip inside `out_dir`.
///
/// Entries are stored under their file names, in the order given.
pub fn archive_files<P: AsRef<Path>>(
    paths: &[P],
    out_dir: impl AsRef<Path>,
) -> StoreResult<PathBuf> {
    let first = paths.first().ok_or(StoreError::EmptyArchive)?.as_ref();
    let archive_path = out_dir
        .as_ref()
        .join(format!("{}.zip", file_name(first)?));

    let entries = paths
        .iter()
        .map(|p| -> StoreResult<(String, PathBuf)> {
            let p = p.as_ref();
            Ok((file_name(p)?, p.to_path_buf()))
        })
        .collect::<StoreResult<Vec<_>>>()?;

    write_archive(&archive_path, &entries)?;
    Ok(archive_path)
}

/// Archive every file below `dir` into `<dir name>.zip` inside `out_dir`.
///
/// Entry names are relative to `dir` and use `/` separators. Directories
/// themselves are not stored, and neither is the archive being written.
pub fn archive_dir(dir: impl AsRef<Path>, out_dir: impl AsRef<Path>) -> StoreResult<PathBuf> {
    let dir = dir.as_ref();
    let archive_path = out_dir.as_ref().join(format!("{}.zip", file_name(dir)?));

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file()
            || entry.path() == archive_path.as_path()
            || entry.path() == staging_path(&archive_path).as_path()
        {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|_| StoreError::InvalidPath {
                path: entry.path().to_path_buf(),
            })?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        entries.push((name, entry.into_path()));
    }

    if entries.is_empty() {
        return Err(StoreError::EmptyArchive);
    }

    write_archive(&archive_path, &entries)?;
    Ok(archive_path)
}

fn file_name(path: &Path) -> StoreResult<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| StoreError::InvalidPath {
            path: path.to_path_buf(),
        })
}

fn write_archive(archive_path: &Path, entries: &[(String, PathBuf)]) -> StoreResult<()> {
    if let Some(parent) = archive_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let sources = entries
        .iter()
        .map(|(name, source)| -> StoreResult<_> { Ok((name.as_str(), File::open(source)?)) })
        .collect::<StoreResult<Vec<_>>>()?;

    // Staged beside the target; only a finished zip is renamed in.
    let staging = staging_path(archive_path);
    let written = write_zip(&staging, sources)
        .and_then(|()| std::fs::rename(&staging, archive_path).map_err(StoreError::from));
    if let Err(err) = written {
        let _ = std::fs::remove_file(&staging);
        return Err(err);
    }

    info!(
        path = %archive_path.display(),
        entries = entries.len(),
        "archive_written"
    );
    Ok(())
}

fn staging_path(archive_path: &Path) -> PathBuf {
    let mut name = archive_path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_zip(path: &Path, sources: Vec<(&str, File)>) -> StoreResult<()> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(File::create(path)?);

    for (name, mut input) in sources {
        zip.start_file(name, options)?;
        io::copy(&mut input, &mut zip)?;
    }
    zip.finish()?;
    Ok(())
}
