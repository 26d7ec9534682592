//! Binary file parts.

use std::fmt;

use bytes::Bytes;
use mime::Mime;

use super::{raw::RawPart, FromPart, PartsConfig};
use crate::PartError;

/// A file part held in memory.
///
/// Any content type is accepted. A present part with an empty body is still a file, of size zero.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Name of the part in the form.
    pub name: String,
    /// The `filename` value in the `content-disposition` header.
    pub file_name: Option<String>,
    /// The value of the `content-type` header.
    pub content_type: Option<Mime>,
    /// File contents.
    pub data: Bytes,
}

impl FilePart {
    /// Size of the file in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl FromPart for FilePart {
    fn from_part(part: RawPart, _: &PartsConfig) -> Result<Self, PartError> {
        Ok(FilePart {
            name: part.name,
            file_name: part.file_name,
            content_type: part.content_type,
            data: part.data,
        })
    }
}

impl fmt::Display for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilePart[name={}", self.name)?;

        if let Some(file_name) = &self.file_name {
            write!(f, ", filename={file_name}")?;
        }

        if let Some(content_type) = &self.content_type {
            write!(f, ", content-type={content_type}")?;
        }

        write!(f, ", size={}]", self.size())
    }
}
