//! Multipart form binding where an absent optional part is never an error.
//!
//! Every part a form declares goes through one resolver, [`form::resolve::resolve`], which looks at
//! the part's declared [`Optionality`](form::resolve::Optionality) before anything is decoded. An
//! optional part that the request does not carry resolves to `None`, whether it is a JSON document
//! or a file. Only a missing *required* part fails the request.
//!
//! The service exposes two endpoints that differ in how the `item` part is declared:
//!
//! ```no_run
//! use actix_web::{middleware::Logger, App, HttpServer};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     HttpServer::new(|| {
//!         App::new()
//!             .configure(optional_parts::handlers::configure)
//!             .wrap(Logger::default())
//!     })
//!     .bind(("127.0.0.1", 8080))?
//!     .run()
//!     .await
//! }
//! ```

#![deny(rust_2018_idioms)]
#![warn(missing_docs)]

mod error;
pub mod form;
pub mod handlers;
mod item;

pub use self::error::PartError;
pub use self::item::Item;
