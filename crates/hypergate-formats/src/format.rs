// crates/hypergate-formats/src/format.rs
// ============================================================================
// Module: Format Trait
// Description: One media type's full set of message mappers.
// Purpose: Hand the engine every writer strategy of a format at once.
// Dependencies: hypergate-core
// ============================================================================

//! ## Overview
//! A [`Format`] bundles the message mappers of one media type. The engine
//! selects a format by negotiation and drives every writer through it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use hypergate_core::writer::BatchMessageMapper;
use hypergate_core::writer::DocumentationMessageMapper;
use hypergate_core::writer::FormMessageMapper;
use hypergate_core::writer::MessageMapper;
use hypergate_core::writer::PageMessageMapper;
use hypergate_core::writer::SingleModelMessageMapper;

// ============================================================================
// SECTION: Format
// ============================================================================

/// A hypermedia format: one mapper per document kind.
///
/// Implemented for every type that implements all mapper traits.
pub trait Format: Send + Sync {
    /// Returns the media type produced by this format.
    fn media_type(&self) -> &str;

    /// Returns the single model mapper.
    fn single_model(&self) -> &dyn SingleModelMessageMapper;

    /// Returns the page mapper.
    fn page(&self) -> &dyn PageMessageMapper;

    /// Returns the documentation mapper.
    fn documentation(&self) -> &dyn DocumentationMessageMapper;

    /// Returns the form mapper.
    fn form(&self) -> &dyn FormMessageMapper;

    /// Returns the batch mapper.
    fn batch(&self) -> &dyn BatchMessageMapper;
}

impl<T> Format for T
where
    T: SingleModelMessageMapper
        + PageMessageMapper
        + DocumentationMessageMapper
        + FormMessageMapper
        + BatchMessageMapper,
{
    fn media_type(&self) -> &str {
        MessageMapper::media_type(self)
    }

    fn single_model(&self) -> &dyn SingleModelMessageMapper {
        self
    }

    fn page(&self) -> &dyn PageMessageMapper {
        self
    }

    fn documentation(&self) -> &dyn DocumentationMessageMapper {
        self
    }

    fn form(&self) -> &dyn FormMessageMapper {
        self
    }

    fn batch(&self) -> &dyn BatchMessageMapper {
        self
    }
}
