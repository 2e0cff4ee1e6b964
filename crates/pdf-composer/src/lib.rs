//! PDF composition utilities for batch label output.
//!
//! Single-page label documents are concatenated page by page into one
//! composite document, in the order given:
//! - Deep object copying with cycle detection
//! - Inherited page attributes are materialized on the copied page
//! - The result is written without timestamps, so equal input gives equal bytes

mod error;

pub use error::ComposerError;

use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&str; 4] = ["Resources", "MediaBox", "CropBox", "Rotate"];

/// Copies objects from one document into another, remapping object ids.
struct ObjectCopier<'a> {
    source_doc: &'a Document,
    target_doc: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source_doc: &'a Document, target_doc: &'a mut Document) -> Self {
        Self { source_doc, target_doc, id_map: HashMap::new() }
    }

    /// Deep copies an object and everything it references. Each source object
    /// is copied at most once.
    fn copy_object(&mut self, source_id: ObjectId) -> Result<ObjectId, lopdf::Error> {
        if let Some(target_id) = self.id_map.get(&source_id) {
            return Ok(*target_id);
        }

        // Reserve the id before recursing so reference cycles terminate.
        let new_id = self.target_doc.add_object(Object::Null);
        self.id_map.insert(source_id, new_id);

        let obj = self.source_doc.get_object(source_id)?.clone();
        let new_obj = self.remap_references(obj)?;
        self.target_doc.objects.insert(new_id, new_obj);
        Ok(new_id)
    }

    /// Copies a page without its source page tree and attaches it to
    /// `parent` in the target.
    fn copy_page(&mut self, page_id: ObjectId, parent: ObjectId) -> Result<ObjectId, lopdf::Error> {
        let mut page = self.source_doc.get_dictionary(page_id)?.clone();
        for key in INHERITABLE {
            if !page.has(key.as_bytes()) {
                if let Some(value) = self.inherited(&page, key)? {
                    page.set(key, value);
                }
            }
        }
        page.remove(b"Parent");

        let new_id = self.target_doc.add_object(Object::Null);
        self.id_map.insert(page_id, new_id);
        for (_, value) in page.iter_mut() {
            *value = self.remap_references(value.clone())?;
        }
        page.set("Parent", Object::Reference(parent));
        self.target_doc.objects.insert(new_id, Object::Dictionary(page));
        Ok(new_id)
    }

    /// Looks `key` up along the page's `Parent` chain.
    fn inherited(&self, page: &Dictionary, key: &str) -> Result<Option<Object>, lopdf::Error> {
        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
        while let Some(id) = parent {
            let node = self.source_doc.get_dictionary(id)?;
            if let Ok(value) = node.get(key.as_bytes()) {
                return Ok(Some(value.clone()));
            }
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        }
        Ok(None)
    }

    /// Replaces every `Object::Reference` with the id of its copy.
    fn remap_references(&mut self, obj: Object) -> Result<Object, lopdf::Error> {
        match obj {
            Object::Reference(id) => Ok(Object::Reference(self.copy_object(id)?)),
            Object::Array(arr) => {
                let new_arr = arr
                    .into_iter()
                    .map(|o| self.remap_references(o))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Object::Array(new_arr))
            }
            Object::Dictionary(mut dict) => {
                for (_, value) in dict.iter_mut() {
                    *value = self.remap_references(value.clone())?;
                }
                Ok(Object::Dictionary(dict))
            }
            Object::Stream(mut stream) => {
                for (_, value) in stream.dict.iter_mut() {
                    *value = self.remap_references(value.clone())?;
                }
                Ok(Object::Stream(stream))
            }
            _ => Ok(obj),
        }
    }
}

/// Appends every page of `source` to the end of `target`, in page order.
///
/// Returns the number of pages appended.
pub fn append_document(target: &mut Document, source: &Document) -> Result<usize, ComposerError> {
    let root_id = target.trailer.get(b"Root")?.as_reference()?;
    let pages_id = target.get_dictionary(root_id)?.get(b"Pages")?.as_reference()?;

    // `get_pages` is keyed by page number, so iteration is in page order.
    let source_pages: Vec<ObjectId> = source.get_pages().into_values().collect();
    let mut copier = ObjectCopier::new(source, target);
    let mut new_kids = Vec::with_capacity(source_pages.len());
    for page_id in &source_pages {
        new_kids.push(Object::Reference(copier.copy_page(*page_id, pages_id)?));
    }

    let pages_dict = target.get_object_mut(pages_id)?.as_dict_mut()?;
    let mut kids = pages_dict.get(b"Kids")?.as_array()?.clone();
    let count = pages_dict.get(b"Count")?.as_i64()?;
    kids.extend(new_kids);
    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set("Count", count + source_pages.len() as i64);

    Ok(source_pages.len())
}

/// Concatenates documents page by page, preserving the given order.
///
/// The first document becomes the base of the composite; every page of the
/// following documents is appended after it.
pub fn concat_documents(documents: Vec<Document>) -> Result<Document, ComposerError> {
    let mut documents = documents.into_iter().enumerate();
    let (_, mut composite) = documents.next().ok_or(ComposerError::Empty)?;
    if composite.get_pages().is_empty() {
        return Err(ComposerError::NoPages { index: 0 });
    }

    for (index, document) in documents {
        if append_document(&mut composite, &document)? == 0 {
            return Err(ComposerError::NoPages { index });
        }
    }
    log::debug!("Composed document with {} pages", composite.get_pages().len());
    Ok(composite)
}

/// Parses serialized PDFs, concatenates them and serializes the result.
pub fn concat_pdf_bytes<B: AsRef<[u8]>>(parts: &[B]) -> Result<Vec<u8>, ComposerError> {
    let documents = parts
        .iter()
        .map(|bytes| Document::load_mem(bytes.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let mut composite = concat_documents(documents)?;
    let mut bytes = Vec::new();
    composite.save_to(&mut bytes).map_err(lopdf::Error::from)?;
    Ok(bytes)
}
