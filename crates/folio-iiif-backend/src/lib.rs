//! FSI-style render-backend adapter for the Folio IIIF engine.
//!
//! Translates resolved request geometry into the renderer's own fetch-URL
//! dialect and parses the renderer's XML metadata envelope. The rest of the
//! engine reaches this crate only through the `ArchiveStore` and
//! `RenderBackend` traits from `folio-iiif-core`, so it stays
//! backend-agnostic and testable without network access.

pub mod fsi;
pub mod metadata;

pub use fsi::{FsiBackend, info_url, render_url};
pub use metadata::{MetadataError, parse_render_info};
