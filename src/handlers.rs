//! The `/good` and `/bad` endpoints.
//!
//! Both accept the same `item` and `file` parts. `/good` declares `item` required, `/bad` declares
//! it optional and answers with the empty [`Item`] when it is left out. An absent `file` resolves
//! to no file on both.

use actix_web::{post, web};

use crate::{
    form::{
        file::FilePart,
        json::Json,
        resolve::{or_empty, PartSpec},
        MultipartParts, PartMap, Parts,
    },
    Item, PartError,
};

/// Form accepted by `/good`.
pub struct GoodForm {
    /// The structured `item` part.
    pub item: Json<Item>,
    /// The auxiliary `file` part, if submitted.
    pub file: Option<FilePart>,
}

impl MultipartParts for GoodForm {
    const PARTS: &'static [PartSpec] = &[PartSpec::required("item"), PartSpec::optional("file")];

    fn from_parts(parts: &mut PartMap) -> Result<Self, PartError> {
        Ok(Self {
            item: parts.required("item")?,
            file: parts.optional("file")?,
        })
    }
}

/// Form accepted by `/bad`.
pub struct BadForm {
    /// The structured `item` part, if submitted.
    pub item: Option<Json<Item>>,
    /// The auxiliary `file` part, if submitted.
    pub file: Option<FilePart>,
}

impl MultipartParts for BadForm {
    const PARTS: &'static [PartSpec] = &[PartSpec::optional("item"), PartSpec::optional("file")];

    fn from_parts(parts: &mut PartMap) -> Result<Self, PartError> {
        Ok(Self {
            item: parts.optional("item")?,
            file: parts.optional("file")?,
        })
    }
}

fn log_file(file: Option<&FilePart>) {
    if let Some(file) = file {
        log::info!("{file}");
    }
}

/// Responds with the submitted item.
#[post("/good")]
pub async fn good(Parts(form): Parts<GoodForm>) -> web::Json<Item> {
    log_file(form.file.as_ref());
    web::Json(form.item.into_inner())
}

/// Responds with the submitted item, or the empty item when none was sent.
#[post("/bad")]
pub async fn bad(Parts(form): Parts<BadForm>) -> web::Json<Item> {
    log_file(form.file.as_ref());
    web::Json(or_empty(form.item.map(Json::into_inner)))
}

/// Registers both endpoints.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(good).service(bad);
}
