use crate::error::{Result, StoreError};
use crate::paths;
use rolodex_core::time::now_timestamp;
use rolodex_core::Record;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const WRITER_TAG: &str = "rolodex";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(rename = "fecha_actualizacion")]
    pub updated_at: String,
    #[serde(rename = "total_registros")]
    pub total_records: usize,
    #[serde(rename = "fuente", default, skip_serializing_if = "Option::is_none")]
    pub writer: Option<String>,
}

#[derive(Debug, Serialize)]
struct StoreFileRef<'a> {
    metadata: Metadata,
    #[serde(rename = "registros")]
    records: &'a [Record],
}

#[derive(Debug, Deserialize)]
struct StoreFile {
    #[serde(rename = "registros", default)]
    records: Vec<Record>,
}

/// Reads the record list of a store file.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    match serde_json::from_str::<StoreFile>(&contents) {
        Ok(file) => Ok(file.records),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "store file unreadable, starting empty");
            Ok(Vec::new())
        }
    }
}

/// Overwrites the store file with `records` and fresh metadata.
///
/// The file is written next to its destination and renamed into place, so a
/// failed save leaves the previous contents untouched.
pub fn write_records(path: &Path, records: &[Record]) -> Result<()> {
    paths::ensure_parent_dir(path)?;
    let file = StoreFileRef {
        metadata: Metadata {
            updated_at: now_timestamp(),
            total_records: records.len(),
            writer: Some(WRITER_TAG.to_string()),
        },
        records,
    };

    let tmp = tmp_path(path);
    let write = || -> io::Result<()> {
        let handle = File::create(&tmp)?;
        let mut writer = BufWriter::new(handle);
        serde_json::to_writer_pretty(&mut writer, &file)?;
        writer.write_all(b"\n")?;
        let handle = writer.into_inner().map_err(|err| err.into_error())?;
        handle.sync_all()?;
        fs::rename(&tmp, path)
    };

    write().map_err(|source| {
        let _ = fs::remove_file(&tmp);
        StoreError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Metadata block of a store file, if present and well-formed.
pub fn read_metadata(path: &Path) -> Result<Option<Metadata>> {
    #[derive(Deserialize)]
    struct MetadataOnly {
        metadata: Option<Metadata>,
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    Ok(serde_json::from_str::<MetadataOnly>(&contents)
        .ok()
        .and_then(|file| file.metadata))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
