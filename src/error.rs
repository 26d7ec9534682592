//! Error and Result module

use actix_web::{error::PayloadError, http::StatusCode, ResponseError};
use derive_more::{Display, Error};

/// A set of errors that can occur while collecting and binding the parts of a form.
#[derive(Debug, Display, Error)]
#[non_exhaustive]
pub enum PartError {
    /// The body of a present part is not a valid document for its target type.
    #[display("Failed to decode part `{name}`: {source}")]
    Decode {
        /// Name of the offending part.
        name: String,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },

    /// A part declared as required is not present in the request.
    #[display("Required request part `{_0}` is not present")]
    MissingRequiredPart(#[error(not(source))] String),

    /// A structured part carries a content type its decoder does not accept.
    #[display("Part `{name}` has unsupported content type `{content_type}`")]
    UnsupportedContentType {
        /// Name of the offending part.
        name: String,
        /// The declared content type.
        content_type: String,
    },

    /// The request is not `multipart/form-data`.
    #[display("Request content type is not `multipart/form-data`")]
    NotFormData,

    /// The `multipart/form-data` content type has no boundary parameter.
    #[display("Multipart boundary is not found")]
    NoBoundary,

    /// A declared part appeared more than once while duplicates are denied.
    #[display("Duplicate part found for: `{_0}`")]
    DuplicatePart(#[error(not(source))] String),

    /// A part that the form does not declare while unknown parts are denied.
    #[display("Unsupported part `{_0}`")]
    UnknownPart(#[error(not(source))] String),

    /// The request body exceeds the configured total limit.
    #[display("Request body exceeds the {_0} byte limit")]
    BodyOverflow(#[error(not(source))] usize),

    /// A single part exceeds its own size limit.
    #[display("Part `{_0}` exceeds its size limit")]
    PartOverflow(#[error(not(source))] String),

    /// A form tried to bind a part name it never declared.
    #[display("Part `{_0}` is not declared by the form")]
    UndeclaredPart(#[error(not(source))] String),

    /// A form bound a part declared optional through the required-part path.
    #[display("Part `{_0}` is declared optional but bound as required")]
    OptionalityMismatch(#[error(not(source))] String),

    /// The multipart stream itself is malformed.
    #[display("{_0}")]
    Multipart(actix_multipart::MultipartError),

    /// Reading the request payload failed.
    #[display("{_0}")]
    Payload(PayloadError),
}

impl From<actix_multipart::MultipartError> for PartError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        Self::Multipart(err)
    }
}

impl From<PayloadError> for PartError {
    fn from(err: PayloadError) -> Self {
        Self::Payload(err)
    }
}

impl ResponseError for PartError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFormData | Self::UnsupportedContentType { .. } => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            Self::BodyOverflow(_) | Self::PartOverflow(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UndeclaredPart(_) | Self::OptionalityMismatch(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Multipart(err) => err.status_code(),
            Self::Payload(err) => err.status_code(),
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_part_is_client_error() {
        let err = PartError::MissingRequiredPart("item".to_owned());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Required request part `item` is not present"
        );

        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn decode_error_is_client_error() {
        let source = serde_json::from_str::<u8>("{nope").unwrap_err();
        let err = PartError::Decode {
            name: "item".to_owned(),
            source,
        };
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().starts_with("Failed to decode part `item`"));
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            PartError::NotFormData.status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            PartError::BodyOverflow(8).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            PartError::PartOverflow("file".to_owned()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            PartError::UndeclaredPart("x".to_owned()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            PartError::OptionalityMismatch("item".to_owned()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            PartError::DuplicatePart("item".to_owned()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
