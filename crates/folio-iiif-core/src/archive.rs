//! The archive-store collaborator: the source of truth for which
//! identifiers exist and what their pixel dimensions are.

use async_trait::async_trait;
use folio_iiif_model::IiifResult;

/// Supplies pixel dimensions for archived images.
///
/// Implementations are expected to answer `NotFound` for identifiers the
/// archive does not know; the engine propagates that unchanged rather than
/// reinterpreting it as a parse failure.
#[async_trait]
pub trait ArchiveStore: Send + Sync + 'static {
    /// Look up the source pixel dimensions of an identifier.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown identifiers; backend errors pass through.
    async fn dimensions_of(&self, identifier: &str) -> IiifResult<(u32, u32)>;
}
