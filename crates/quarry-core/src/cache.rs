//! Cached package archives
//!
//! A fetched package lands in the repository's cache directory as a tar
//! archive, optionally zstd- or gzip-compressed (sniffed by magic bytes,
//! not extension). The archive embeds its own metadata as a
//! `manifest.json` entry; this module only ever reads that entry -- the
//! payload itself is extracted elsewhere.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use serde::Deserialize;

use crate::error::RepoError;

/// Archive entry holding the package metadata.
const MANIFEST_NAME: &str = "manifest.json";

const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// One packaged file as recorded in the archive manifest.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ManifestFile {
    /// Absolute path the file installs to.
    pub(crate) path: String,
    /// Content checksum; absent for files packaged without one.
    #[serde(default)]
    pub(crate) sum: String,
}

/// The metadata a package archive carries about itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ArchiveManifest {
    /// Every file in the package, with checksums.
    #[serde(default)]
    pub(crate) files: Vec<ManifestFile>,
    /// Paths of the files managed as configuration files.
    #[serde(default)]
    pub(crate) config: Vec<String>,
    /// Directories the package owns.
    #[serde(default)]
    pub(crate) directories: Vec<String>,
}

/// Wrap the archive file in the decoder its magic bytes call for.
fn open_reader(path: &Path) -> Result<Box<dyn Read>, RepoError> {
    let mut file = File::open(path)?;
    let mut magic = [0u8; 4];
    let got = file.read(&mut magic)?;
    file.seek(SeekFrom::Start(0))?;

    let reader: Box<dyn Read> = if got >= 4 && magic == ZSTD_MAGIC {
        Box::new(zstd::stream::Decoder::new(BufReader::new(file))?)
    } else if got >= 2 && magic[..2] == GZIP_MAGIC {
        Box::new(flate2::read::GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(reader)
}

/// Read the embedded manifest out of a cached package archive.
///
/// An absent or unreadable archive is an I/O error; an archive without a
/// manifest entry, or with a manifest that does not parse, is its own
/// failure.
pub(crate) fn read_manifest(path: &Path) -> Result<ArchiveManifest, RepoError> {
    let mut archive = tar::Archive::new(open_reader(path)?);
    for entry in archive.entries()? {
        let entry = entry?;
        if entry.path()?.as_ref() == Path::new(MANIFEST_NAME) {
            let manifest = serde_json::from_reader(entry)?;
            return Ok(manifest);
        }
    }
    Err(RepoError::NoManifest(path.to_path_buf()))
}
