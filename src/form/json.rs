//! Deserializes a part as JSON.

use derive_more::{Deref, DerefMut};
use mime::Mime;
use serde::de::DeserializeOwned;

use super::{raw::RawPart, FromPart, PartsConfig};
use crate::PartError;

/// Deserialize from JSON.
///
/// Unknown fields are ignored unless `T` itself denies them. A present part with an empty body is
/// decoded like any other and fails with [`PartError::Decode`].
#[derive(Debug, Deref, DerefMut)]
pub struct Json<T: DeserializeOwned>(pub T);

impl<T: DeserializeOwned> Json<T> {
    /// Unwraps into inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned> FromPart for Json<T> {
    fn from_part(part: RawPart, config: &PartsConfig) -> Result<Self, PartError> {
        if config.validate_json_content_type {
            // a part without a content type is taken at its word
            if let Some(mime) = part.content_type.as_ref().filter(|mime| !is_json(mime)) {
                return Err(PartError::UnsupportedContentType {
                    name: part.name,
                    content_type: mime.to_string(),
                });
            }
        }

        serde_json::from_slice(&part.data)
            .map(Json)
            .map_err(|source| PartError::Decode {
                name: part.name,
                source,
            })
    }
}

fn is_json(mime: &Mime) -> bool {
    mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON)
}
