//! IIIF HTTP routing, response serialization, and hyper service.
//!
//! This crate provides the HTTP layer for a IIIF Image API server. It
//! handles:
//!
//! - **Routing** ([`router`]): Maps HTTP requests to IIIF engine operations
//!   by examining method and path, using the total request classifier from
//!   `folio-iiif-model`.
//!
//! - **Response serialization** ([`response`]): Builds image, `info.json`,
//!   and JSON error responses with appropriate status codes and media types.
//!
//! - **Dispatch** ([`dispatch`]): Routes parsed requests to the engine via
//!   the [`IiifHandler`](dispatch::IiifHandler) trait.
//!
//! - **Service** ([`service`]): The main
//!   [`IiifHttpService`](service::IiifHttpService) that implements hyper's
//!   `Service` trait, tying routing, dispatch, and middleware together.
//!
//! - **Body** ([`body`]): The [`IiifResponseBody`](body::IiifResponseBody)
//!   type supporting buffered and empty response modes.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> IiifHttpService (hyper Service)
//!     -> Health check / CORS interception
//!     -> IiifRouter (classify + full parse)
//!     -> dispatch_request (IiifHandler trait)
//!     -> Common response headers (x-request-id, Server, CORS)
//!   <- HTTP Response
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use folio_iiif_http::dispatch::UnavailableHandler;
//! use folio_iiif_http::service::IiifHttpService;
//! use folio_iiif_model::Format;
//!
//! let service = IiifHttpService::new(UnavailableHandler, Format::Jpg);
//! // Use `service` with hyper server.
//! ```

// IiifError is a fundamental domain error type used pervasively as
// Result<T, IiifError>. Boxing it in every Result would add indirection on
// the hot path for negligible benefit.
#![allow(clippy::result_large_err)]

pub mod body;
pub mod dispatch;
pub mod response;
pub mod router;
pub mod service;

pub use body::IiifResponseBody;
pub use dispatch::{IiifHandler, dispatch_request};
pub use response::{error_to_response, image_response, info_response};
pub use router::{IiifRouter, RoutedRequest};
pub use service::IiifHttpService;
