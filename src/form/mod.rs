//! Collect the parts of a `multipart/form-data` request and bind them to a typed form.
//!
//! Binding happens in two steps. The [`Parts`] extractor first streams the body and keeps every
//! part the form declares in a [`PartMap`], applying the limits and policies of [`PartsConfig`].
//! The form then takes each part out of the map; every take goes through
//! [`resolve`](resolve::resolve), so a declared-optional part that never arrived comes back as
//! `None` regardless of its type.

use std::{collections::HashMap, future::ready, sync::Arc};

use actix_multipart::Multipart;
use actix_web::{dev, error::PayloadError, web, Error, FromRequest, HttpMessage as _, HttpRequest};
use bytes::{Bytes, BytesMut};
use derive_more::{Deref, DerefMut};
use futures_core::future::LocalBoxFuture;
use futures_util::{stream, TryStreamExt as _};

use crate::PartError;

pub mod file;
pub mod json;
pub mod raw;
pub mod resolve;

use self::{
    raw::RawPart,
    resolve::{resolve, resolve_required, PartSpec},
};

/// Decodes a collected part into `Self`.
pub trait FromPart: Sized {
    /// Converts the raw part. Only called for parts that are present in the request.
    fn from_part(part: RawPart, config: &PartsConfig) -> Result<Self, PartError>;
}

impl FromPart for RawPart {
    fn from_part(part: RawPart, _: &PartsConfig) -> Result<Self, PartError> {
        Ok(part)
    }
}

/// Trait for forms that can be used with the [`Parts`] extractor.
///
/// ```
/// use optional_parts::form::{
///     file::FilePart, json::Json, resolve::PartSpec, MultipartParts, PartMap,
/// };
/// use optional_parts::{Item, PartError};
///
/// struct Upload {
///     item: Option<Json<Item>>,
///     file: Option<FilePart>,
/// }
///
/// impl MultipartParts for Upload {
///     const PARTS: &'static [PartSpec] = &[
///         PartSpec::optional("item"),
///         PartSpec::optional("file").limit(10 * 1024 * 1024),
///     ];
///
///     fn from_parts(parts: &mut PartMap) -> Result<Self, PartError> {
///         Ok(Self {
///             item: parts.optional("item")?,
///             file: parts.optional("file")?,
///         })
///     }
/// }
/// ```
pub trait MultipartParts: Sized {
    /// Every part the form binds. Parts with other names are not kept.
    const PARTS: &'static [PartSpec];

    /// Builds the form from the collected parts.
    fn from_parts(parts: &mut PartMap) -> Result<Self, PartError>;
}

/// The declared parts of one request, before they are bound.
pub struct PartMap {
    specs: &'static [PartSpec],
    parts: HashMap<String, RawPart>,
    config: PartsConfig,
}

impl PartMap {
    /// Creates an empty map for the given declarations, using the default configuration.
    pub fn new(specs: &'static [PartSpec]) -> Self {
        Self::with_config(specs, PartsConfig::default())
    }

    /// Creates an empty map for the given declarations.
    pub fn with_config(specs: &'static [PartSpec], config: PartsConfig) -> Self {
        Self {
            specs,
            parts: HashMap::new(),
            config,
        }
    }

    /// Looks up the declaration for a part name.
    pub fn spec(&self, name: &str) -> Option<&'static PartSpec> {
        self.specs.iter().find(|spec| spec.name() == name)
    }

    /// Stores a part, returning the previous one with the same name.
    pub fn insert(&mut self, part: RawPart) -> Option<RawPart> {
        self.parts.insert(part.name.clone(), part)
    }

    /// Returns true if a part with this name has been collected.
    pub fn contains(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    /// Number of collected parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns true if no part has been collected.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Binds a part whose value the form cannot do without.
    ///
    /// The part has to be declared required. An optional declaration fails with
    /// [`PartError::OptionalityMismatch`], an absent required part with
    /// [`PartError::MissingRequiredPart`].
    pub fn required<T: FromPart>(&mut self, name: &str) -> Result<T, PartError> {
        let spec = self.declared(name)?;
        let part = resolve_required(spec, self.parts.remove(name))?;
        T::from_part(part, &self.config)
    }

    /// Binds a part that may be absent. Absence is `Ok(None)` when the part is declared optional.
    pub fn optional<T: FromPart>(&mut self, name: &str) -> Result<Option<T>, PartError> {
        let spec = self.declared(name)?;

        match resolve(spec, self.parts.remove(name))? {
            Some(part) => T::from_part(part, &self.config).map(Some),
            None => Ok(None),
        }
    }

    fn declared(&self, name: &str) -> Result<&'static PartSpec, PartError> {
        self.spec(name)
            .ok_or_else(|| PartError::UndeclaredPart(name.to_owned()))
    }
}

/// What to do when a declared part appears more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePart {
    /// Additional parts are not processed.
    Ignore,

    /// An error will be raised.
    Deny,

    /// All parts will be processed, the last one will replace all previous.
    Replace,
}

/// Used to keep track of the remaining limit of the part being read.
pub(crate) struct Limits {
    part_limit_remaining: Option<usize>,
}

impl Limits {
    pub(crate) fn try_consume(&mut self, name: &str, bytes: usize) -> Result<(), PartError> {
        if let Some(part_limit) = self.part_limit_remaining {
            self.part_limit_remaining = Some(
                part_limit
                    .checked_sub(bytes)
                    .ok_or_else(|| PartError::PartOverflow(name.to_owned()))?,
            );
        }

        Ok(())
    }
}

/// Typed `multipart/form-data` extractor.
///
/// The inner type declares its parts through [`MultipartParts`]. Requests with any other
/// content type are rejected with `415 Unsupported Media Type`.
///
/// Add a [`PartsConfig`] to your app data to configure extraction.
#[derive(Deref, DerefMut)]
pub struct Parts<T: MultipartParts>(pub T);

impl<T: MultipartParts> Parts<T> {
    /// Unwrap into inner `T` value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for Parts<T>
where
    T: MultipartParts + 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    #[inline]
    fn from_request(req: &HttpRequest, payload: &mut dev::Payload) -> Self::Future {
        let config = PartsConfig::from_req(req).clone();
        let req = req.clone();
        let payload = payload.take();

        Box::pin(async move {
            extract::<T>(&req, payload, config.clone())
                .await
                .map(Parts)
                .map_err(|err| config.map_error(&req, err))
        })
    }
}

async fn extract<T: MultipartParts>(
    req: &HttpRequest,
    payload: dev::Payload,
    config: PartsConfig,
) -> Result<T, PartError> {
    let boundary = form_data_boundary(req)?;
    let body = read_body(payload, config.total_limit).await?;

    let mut parts = if is_empty_form(&body, &boundary) {
        log::debug!("multipart body carries no parts");
        PartMap::with_config(T::PARTS, config)
    } else {
        let stream = stream::once(ready(Ok::<_, PayloadError>(body)));
        let multipart = Multipart::new(req.headers(), stream);
        collect(multipart, T::PARTS, config).await?
    };

    T::from_parts(&mut parts)
}

/// Checks the request content type and returns its boundary.
fn form_data_boundary(req: &HttpRequest) -> Result<String, PartError> {
    let mime = req
        .mime_type()
        .ok()
        .flatten()
        .filter(|mime| mime.type_() == mime::MULTIPART && mime.subtype() == mime::FORM_DATA)
        .ok_or(PartError::NotFormData)?;

    mime.get_param(mime::BOUNDARY)
        .map(|boundary| boundary.as_str().to_owned())
        .ok_or(PartError::NoBoundary)
}

async fn read_body(mut payload: dev::Payload, limit: usize) -> Result<Bytes, PartError> {
    let mut body = BytesMut::new();

    while let Some(chunk) = payload.try_next().await? {
        if body.len() + chunk.len() > limit {
            return Err(PartError::BodyOverflow(limit));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body.freeze())
}

/// Returns true for a body without any part: nothing at all, or only the close delimiter.
fn is_empty_form(body: &[u8], boundary: &str) -> bool {
    let start = body.iter().position(|b| !b.is_ascii_whitespace());
    let end = body.iter().rposition(|b| !b.is_ascii_whitespace());

    match (start, end) {
        (Some(start), Some(end)) => body[start..=end] == *format!("--{boundary}--").as_bytes(),
        _ => true,
    }
}

async fn collect(
    mut multipart: Multipart,
    specs: &'static [PartSpec],
    config: PartsConfig,
) -> Result<PartMap, PartError> {
    let duplicate_part = config.duplicate_part;
    let deny_unknown_parts = config.deny_unknown_parts;

    let mut parts = PartMap::with_config(specs, config);

    // ensure limits are shared for all parts with this name
    let mut part_limits = HashMap::<String, Option<usize>>::new();

    while let Some(mut field) = multipart.try_next().await? {
        let name = field.name().unwrap_or_default().to_owned();

        let Some(spec) = parts.spec(&name) else {
            if deny_unknown_parts {
                return Err(PartError::UnknownPart(name));
            }

            log::debug!("skipping undeclared part `{name}`");
            while field.try_next().await?.is_some() {}
            continue;
        };

        if parts.contains(&name) {
            match duplicate_part {
                DuplicatePart::Ignore => {
                    log::debug!("ignoring duplicate part `{name}`");
                    while field.try_next().await?.is_some() {}
                    continue;
                }

                DuplicatePart::Deny => return Err(PartError::DuplicatePart(name)),

                DuplicatePart::Replace => {}
            }
        }

        let entry = part_limits.entry(name).or_insert_with(|| spec.size_limit());

        let mut limits = Limits {
            part_limit_remaining: *entry,
        };

        let part = RawPart::read(field, &mut limits).await?;

        *entry = limits.part_limit_remaining;
        parts.insert(part);
    }

    Ok(parts)
}

type PartsErrorHandler = Option<Arc<dyn Fn(PartError, &HttpRequest) -> Error + Send + Sync>>;

/// [`Parts`] extractor configuration.
///
/// Add to your app data to have it picked up by [`Parts`] extractors.
#[derive(Clone)]
pub struct PartsConfig {
    total_limit: usize,
    duplicate_part: DuplicatePart,
    deny_unknown_parts: bool,
    validate_json_content_type: bool,
    err_handler: PartsErrorHandler,
}

impl PartsConfig {
    /// Sets maximum accepted payload size for the entire form. By default this limit is 50MiB.
    pub fn total_limit(mut self, total_limit: usize) -> Self {
        self.total_limit = total_limit;
        self
    }

    /// Sets what happens when a declared part is repeated. By default later copies are ignored.
    pub fn duplicate_part(mut self, duplicate_part: DuplicatePart) -> Self {
        self.duplicate_part = duplicate_part;
        self
    }

    /// Sets whether parts the form does not declare fail the request. By default they are skipped.
    pub fn deny_unknown_parts(mut self, deny_unknown_parts: bool) -> Self {
        self.deny_unknown_parts = deny_unknown_parts;
        self
    }

    /// Sets whether a JSON part carrying a non-JSON `Content-Type` is rejected. Parts without a
    /// `Content-Type` are always accepted. Enabled by default.
    pub fn validate_json_content_type(mut self, validate_json_content_type: bool) -> Self {
        self.validate_json_content_type = validate_json_content_type;
        self
    }

    /// Sets custom error handler.
    pub fn error_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(PartError, &HttpRequest) -> Error + Send + Sync + 'static,
    {
        self.err_handler = Some(Arc::new(f));
        self
    }

    /// Extracts payload config from app data. Check both `T` and `Data<T>`, in that order, and fall
    /// back to the default payload config.
    fn from_req(req: &HttpRequest) -> &Self {
        req.app_data::<Self>()
            .or_else(|| req.app_data::<web::Data<Self>>().map(|d| d.as_ref()))
            .unwrap_or(&DEFAULT_CONFIG)
    }

    fn map_error(&self, req: &HttpRequest, err: PartError) -> Error {
        if let Some(err_handler) = self.err_handler.as_ref() {
            (*err_handler)(err, req)
        } else {
            err.into()
        }
    }
}

const DEFAULT_CONFIG: PartsConfig = PartsConfig {
    total_limit: 52_428_800, // 50 MiB
    duplicate_part: DuplicatePart::Ignore,
    deny_unknown_parts: false,
    validate_json_content_type: true,
    err_handler: None,
};

impl Default for PartsConfig {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}
