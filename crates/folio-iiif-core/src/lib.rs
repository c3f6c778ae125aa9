//! Core engine for the Folio IIIF image service.
//!
//! This crate turns validated requests into work: resolving pixel geometry
//! against source dimensions, building capability documents, and driving the
//! archive/backend collaborators through the [`FolioIiif`] provider.
//!
//! # Architecture
//!
//! ```text
//! folio-iiif-http (routing, hyper service)
//!        |
//!        v
//!   FolioIiif provider
//!     |          |
//!     v          v
//! ArchiveStore  RenderBackend   (traits; folio-iiif-backend implements both)
//! ```

pub mod archive;
pub mod backend;
pub mod config;
pub mod geometry;
pub mod info;
pub mod provider;

pub use archive::ArchiveStore;
pub use backend::RenderBackend;
pub use config::ServiceConfig;
pub use geometry::{CropRect, ResolvedGeometry};
pub use info::ImageInfo;
pub use provider::FolioIiif;
