// crates/hypergate-core/src/writer/page.rs
// ============================================================================
// Module: Page Writer
// Description: Fixed traversal of one page of models.
// Purpose: Produce collection documents with paging metadata.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Each item is written into its own document with the page mapper's item
//! mapper and handed back through `on_finish_item`. Collection metadata
//! follows the items; `next` is omitted on the last page and `previous` on
//! the first. An empty page still produces start, metadata, and finish.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::PageModel;
use crate::core::ParamValue;
use crate::core::Resource;
use crate::writer::context::WriteError;
use crate::writer::context::WriterContext;
use crate::writer::context::finish;
use crate::writer::json::JsonObjectBuilder;
use crate::writer::mapper::PageInfo;
use crate::writer::mapper::PageMessageMapper;
use crate::writer::operations::write_operations;
use crate::writer::path::FieldPath;
use crate::writer::single::write_model;

// ============================================================================
// SECTION: Writer
// ============================================================================

/// Writes one page document.
pub struct PageWriter<'a> {
    /// Request context.
    context: &'a WriterContext<'a>,
    /// Format strategy.
    mapper: &'a dyn PageMessageMapper,
}

impl<'a> PageWriter<'a> {
    /// Creates a writer for `mapper`.
    #[must_use]
    pub const fn new(context: &'a WriterContext<'a>, mapper: &'a dyn PageMessageMapper) -> Self {
        Self {
            context,
            mapper,
        }
    }

    /// Writes `page` and serializes the document.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] when the representor is missing, an item
    /// cannot be written, or serialization fails.
    pub fn write(&self, page: &PageModel) -> Result<String, WriteError> {
        finish(&self.write_document(page)?)
    }

    /// Writes `page` into a document builder.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError`] when the representor is missing or an item
    /// cannot be written.
    pub fn write_document(&self, page: &PageModel) -> Result<JsonObjectBuilder, WriteError> {
        let context = self.context;
        let mapper = self.mapper;
        let representor = context.representor(page.resource_name())?;
        let urls = context.urls();
        let pagination = page.pagination();
        let collection_url = urls.collection_of(page.resource());
        let current = u64::from(pagination.page());
        let per_page = pagination.per_page();
        let page_count = pagination.last_page(page.total_count());
        let info = PageInfo {
            resource_name: page.resource_name().to_string(),
            collection_url: collection_url.clone(),
            page: current,
            per_page,
            total_count: page.total_count(),
            page_count,
            item_count: page.len(),
        };

        let mut doc = JsonObjectBuilder::new();
        mapper.on_start(&mut doc, &info);

        let scope = context.scope();
        for (index, item) in page.items().enumerate() {
            let snapshot = representor.snapshot_any(item, &scope)?;
            mapper.on_start_item(&mut doc, &info, index);
            let mut item_doc = JsonObjectBuilder::new();
            write_model(
                context,
                mapper.item_mapper(),
                &mut item_doc,
                &FieldPath::root(),
                Some(page.resource_name()),
                &snapshot,
            )?;
            if let Some(location) = item_doc.collisions().first() {
                return Err(WriteError::Collision {
                    location: location.clone(),
                });
            }
            mapper.on_finish_item(&mut doc, &info, index, item_doc);
        }

        mapper.map_collection_url(&mut doc, &info, &collection_url);
        mapper.map_current_page_url(&mut doc, &info, &urls.page(&collection_url, current, per_page));
        mapper.map_first_page_url(&mut doc, &info, &urls.page(&collection_url, 1, per_page));
        mapper.map_last_page_url(&mut doc, &info, &urls.page(&collection_url, page_count, per_page));
        if current < page_count {
            let next = urls.page(&collection_url, current + 1, per_page);
            mapper.map_next_page_url(&mut doc, &info, &next);
        }
        if current > 1 {
            let previous = urls.page(&collection_url, current - 1, per_page);
            mapper.map_previous_page_url(&mut doc, &info, &previous);
        }
        mapper.map_item_total_count(&mut doc, &info, page.total_count());
        mapper.map_page_count(&mut doc, &info, page_count);

        write_operations(
            context,
            mapper,
            &mut doc,
            &page.resource().shape(),
            &collection_url,
            &collection_params(page.resource()),
        );

        mapper.on_finish(&mut doc, &info);
        Ok(doc)
    }
}

/// Parameters visible to permission checks of collection operations.
fn collection_params(resource: &Resource) -> Vec<ParamValue> {
    resource
        .parent_id()
        .map(|id| ParamValue::ParentId(id.parse::<i64>().map_or_else(|_| id.into(), Into::into)))
        .into_iter()
        .collect()
}
