/*!
 * Writes one QR image per record and verifies the result on disk.
 */

use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::encoder::{EcLevel, QrEncoder};
use crate::errors::WriteError;
use crate::file_utils::FileManager;
use crate::record_parser::Record;

/// A file that was written and verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Encodes records into files under one output folder
#[derive(Debug, Clone)]
pub struct RecordWriter {
    encoder: Arc<dyn QrEncoder>,
    output_folder: PathBuf,
    file_extension: String,
    ec_level: EcLevel,
    pixel_size: u32,
}

impl RecordWriter {
    pub fn new(
        encoder: Arc<dyn QrEncoder>,
        output_folder: impl Into<PathBuf>,
        file_extension: impl Into<String>,
        ec_level: EcLevel,
        pixel_size: u32,
    ) -> Self {
        Self {
            encoder,
            output_folder: output_folder.into(),
            file_extension: file_extension.into(),
            ec_level,
            pixel_size,
        }
    }

    /// Destination for a record
    pub fn destination(&self, record: &Record) -> PathBuf {
        FileManager::generate_output_path(&self.output_folder, &record.name, &self.file_extension)
    }

    /// Encode `record` and check that a non-empty file exists afterwards
    pub fn write(&self, record: &Record) -> Result<WrittenFile, WriteError> {
        let path = self.destination(record);

        if let Err(source) = self.encoder.encode_to_file(
            &record.payload,
            self.ec_level,
            self.pixel_size,
            &path,
        ) {
            return Err(WriteError::Encode { path, source });
        }

        let bytes = Self::validate(&path)?;
        debug!("file: {}, file size: {}", path.display(), bytes);
        Ok(WrittenFile { path, bytes })
    }

    fn validate(path: &Path) -> Result<u64, WriteError> {
        match FileManager::file_size(path) {
            Ok(0) => Err(WriteError::Validation {
                path: path.to_path_buf(),
                reason: "file is empty".to_string(),
            }),
            Ok(bytes) => Ok(bytes),
            Err(e) => Err(WriteError::Validation {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }
}
