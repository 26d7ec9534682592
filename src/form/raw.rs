//! Reads a part into memory without interpreting it.

use actix_multipart::Field;
use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt as _;
use mime::Mime;

use super::Limits;
use crate::PartError;

/// A collected part that has not been decoded yet.
#[derive(Debug, Clone)]
pub struct RawPart {
    /// The `name` value in the `content-disposition` header.
    pub name: String,
    /// The part body.
    pub data: Bytes,
    /// The value of the `content-type` header.
    pub content_type: Option<Mime>,
    /// The `filename` value in the `content-disposition` header.
    pub file_name: Option<String>,
}

impl RawPart {
    /// Creates a part from its name and body.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            content_type: None,
            file_name: None,
        }
    }

    /// Sets the part's content type.
    pub fn content_type(mut self, content_type: Mime) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Sets the part's file name.
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub(crate) async fn read(mut field: Field, limits: &mut Limits) -> Result<Self, PartError> {
        let name = field.name().unwrap_or_default().to_owned();
        let content_type = field.content_type().cloned();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);

        let mut data = BytesMut::new();
        while let Some(chunk) = field.try_next().await? {
            limits.try_consume(&name, chunk.len())?;
            data.extend_from_slice(&chunk);
        }

        Ok(RawPart {
            name,
            data: data.freeze(),
            content_type,
            file_name,
        })
    }
}
