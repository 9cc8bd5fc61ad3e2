//! Gzip-tar packaging of rendered configuration files.
//!
//! TFE extracts uploaded archives as-is, so members must sit at the archive
//! root: each member path is exactly the given file name, with no directory
//! prefix. Names are attached explicitly via `append_path_with_name`; the
//! process working directory is never touched.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{io_err, ArchiveError};

/// Package `file_names` from `source_dir` into a gzip-tar at `output`.
///
/// Only the listed files are included. The archive is written to a `.tmp`
/// sibling and renamed into place.
pub fn archive<S: AsRef<str>>(
    output: &Path,
    source_dir: &Path,
    file_names: &[S],
) -> Result<(), ArchiveError> {
    if file_names.is_empty() {
        return Err(ArchiveError::NoFiles);
    }
    let mut sources = Vec::with_capacity(file_names.len());
    for name in file_names {
        let name = name.as_ref();
        validate_member_name(name)?;
        let path = source_dir.join(name);
        if !path.is_file() {
            return Err(ArchiveError::MissingSource { path });
        }
        sources.push((name, path));
    }

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let tmp = PathBuf::from(format!("{}.tmp", output.display()));
    if let Err(e) = write_archive(&tmp, &sources) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    if let Err(e) = std::fs::rename(&tmp, output) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(output, e));
    }

    tracing::info!(
        archive = %output.display(),
        members = sources.len(),
        "packaged configuration archive"
    );
    Ok(())
}

fn write_archive(tmp: &Path, sources: &[(&str, PathBuf)]) -> Result<(), ArchiveError> {
    let file = File::create(tmp).map_err(|e| io_err(tmp, e))?;
    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.mode(tar::HeaderMode::Deterministic);

    for (name, path) in sources {
        builder
            .append_path_with_name(path, name)
            .map_err(|e| io_err(path, e))?;
        tracing::debug!("archived member {name}");
    }

    let encoder = builder.into_inner().map_err(|e| io_err(tmp, e))?;
    let writer = encoder.finish().map_err(|e| io_err(tmp, e))?;
    let file = writer.into_inner().map_err(|e| io_err(tmp, e.into_error()))?;
    file.sync_all().map_err(|e| io_err(tmp, e))?;
    Ok(())
}

/// Member names must be bare file names: no separators, no `.`/`..`.
fn validate_member_name(name: &str) -> Result<(), ArchiveError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        return Err(ArchiveError::InvalidName { name: name.to_string() });
    }
    Ok(())
}

/// List member paths of a gzip-tar archive, in archive order.
pub fn list_entries(path: &Path) -> Result<Vec<String>, ArchiveError> {
    let file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    let mut names = Vec::new();
    for entry in archive.entries().map_err(|e| io_err(path, e))? {
        let entry = entry.map_err(|e| io_err(path, e))?;
        let member = entry.path().map_err(|e| io_err(path, e))?;
        names.push(member.to_string_lossy().into_owned());
    }
    Ok(names)
}
