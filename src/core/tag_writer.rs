//! Tag writing
//!
//! Sets title, artist and album on a downloaded file and leaves every other
//! tag field alone. MP3 files are edited through their ID3v2 tag directly so
//! frames without a generic equivalent survive the round trip; other
//! containers go through lofty's generic tag.

use lofty::config::{ParseOptions, WriteOptions};
use lofty::file::{AudioFile, FileType, TaggedFileExt};
use lofty::id3::v2::Id3v2Tag;
use lofty::mpeg::MpegFile;
use lofty::prelude::Accessor;
use lofty::probe::Probe;
use lofty::tag::Tag;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::core::error_handling::TagError;
use crate::core::models::MetadataRecord;

/// Tag Writer boundary
pub trait TagWriter: Send + Sync {
    /// Overwrite title/artist/album of the file at `path`, in place
    fn write_tags(&self, path: &Path, record: &MetadataRecord) -> Result<(), TagError>;
}

/// [`TagWriter`] backed by lofty
pub struct LoftyTagWriter {
    /// File type the downloads are expected to have; `None` accepts any
    expected: Option<FileType>,
}

impl LoftyTagWriter {
    /// Writer expecting files of the given audio format ("mp3", "m4a", ...)
    pub fn new(audio_format: &str) -> Self {
        Self {
            expected: FileType::from_ext(audio_format),
        }
    }

    pub fn expected_file_type(&self) -> Option<FileType> {
        self.expected
    }

    fn detect_file_type(path: &Path) -> Result<FileType, TagError> {
        let probe = Probe::open(path)
            .map_err(|e| read_error(path, e))?
            .guess_file_type()
            .map_err(|e| read_error(path, e))?;

        probe.file_type().ok_or_else(|| TagError::Read {
            path: path.to_path_buf(),
            message: "unknown file type".to_string(),
        })
    }

    fn write_id3v2(path: &Path, record: &MetadataRecord) -> Result<(), TagError> {
        let mut file = File::open(path).map_err(|e| read_error(path, e))?;
        let mut mpeg =
            MpegFile::read_from(&mut file, ParseOptions::new()).map_err(|e| read_error(path, e))?;
        drop(file);

        if mpeg.id3v2().is_none() {
            mpeg.set_id3v2(Id3v2Tag::new());
        }
        let tag = mpeg.id3v2_mut().ok_or_else(|| TagError::NoWritableTag {
            path: path.to_path_buf(),
        })?;

        tag.set_title(record.title.clone());
        tag.set_artist(record.artist.clone());
        tag.set_album(record.album.clone());

        mpeg.save_to_path(path, WriteOptions::default())
            .map_err(|e| write_error(path, e))
    }

    fn write_generic(path: &Path, record: &MetadataRecord) -> Result<(), TagError> {
        let mut tagged_file = lofty::read_from_path(path).map_err(|e| read_error(path, e))?;

        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }

        let tag = tagged_file
            .tag_mut(tag_type)
            .ok_or_else(|| TagError::NoWritableTag {
                path: path.to_path_buf(),
            })?;

        tag.set_title(record.title.clone());
        tag.set_artist(record.artist.clone());
        tag.set_album(record.album.clone());

        tagged_file
            .save_to_path(path, WriteOptions::default())
            .map_err(|e| write_error(path, e))
    }
}

impl TagWriter for LoftyTagWriter {
    fn write_tags(&self, path: &Path, record: &MetadataRecord) -> Result<(), TagError> {
        if !path.is_file() {
            return Err(TagError::FileMissing {
                path: path.to_path_buf(),
            });
        }

        let actual = Self::detect_file_type(path)?;
        if let Some(expected) = self.expected {
            if actual != expected {
                return Err(TagError::UnexpectedFormat {
                    path: path.to_path_buf(),
                    expected: format!("{:?}", expected),
                    actual: format!("{:?}", actual),
                });
            }
        }

        debug!("Writing {:?} tags to {}", actual, path.display());
        match actual {
            FileType::Mpeg => Self::write_id3v2(path, record),
            _ => Self::write_generic(path, record),
        }
    }
}

fn read_error(path: &Path, error: impl std::fmt::Display) -> TagError {
    TagError::Read {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

fn write_error(path: &Path, error: impl std::fmt::Display) -> TagError {
    TagError::Write {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
