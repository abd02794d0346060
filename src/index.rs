//! Lookup indexes built once per snapshot before any classification runs.

use crate::normalize::{
    collapse_whitespace, final_path_segment, normalize_text, resolve_absolute_url,
    srcset_candidate_names,
};
use crate::snapshot::{AnchorNode, ImageNode, Snapshot};
use indexmap::{IndexMap, IndexSet};
use url::Url;

/// One anchor's resolved destination and normalized visible text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// Absolute URL serialization.
    pub url: String,
    /// Normalized visible text; may be empty.
    pub text: String,
    /// Visible text with whitespace collapsed but casing kept, for messages.
    pub label: String,
}

/// Read-only view of the source snapshot.
///
/// Collections keep first-insertion order so removal detection reports in
/// document order. Duplicate keys are last-wins: a later anchor replaces the value
/// stored for an earlier one but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceIndex {
    /// Every normalized text leaf value.
    pub texts: IndexSet<String>,
    /// Anchors keyed by absolute URL.
    pub links_by_url: IndexMap<String, LinkEntry>,
    /// Anchors with non-empty text keyed by normalized text.
    pub links_by_text: IndexMap<String, LinkEntry>,
    /// Filenames from every image `src` and `srcset` candidate.
    pub image_names: IndexSet<String>,
}

impl SourceIndex {
    /// True when the source had no text, links or images at all.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.links_by_url.is_empty() && self.image_names.is_empty()
    }
}

/// Walks `doc` once and indexes its text, links and images.
pub fn build_source_index(doc: &Snapshot) -> SourceIndex {
    let mut index = SourceIndex::default();

    for leaf in doc.text_leaves() {
        index.texts.insert(normalize_text(leaf.value));
    }

    for anchor in doc.anchors() {
        let Some(entry) = link_entry(doc.base_url(), &anchor) else {
            continue;
        };
        if !entry.text.is_empty() {
            index.links_by_text.insert(entry.text.clone(), entry.clone());
        }
        index.links_by_url.insert(entry.url.clone(), entry);
    }

    for image in doc.images() {
        index
            .image_names
            .extend(image_candidate_names(doc.base_url(), &image));
    }

    tracing::debug!(
        texts = index.texts.len(),
        links = index.links_by_url.len(),
        images = index.image_names.len(),
        "source index built"
    );
    index
}

/// What the current snapshot contains, for removal lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentIndex {
    /// Every normalized text leaf value.
    pub texts: IndexSet<String>,
    /// Every resolvable anchor URL.
    pub link_urls: IndexSet<String>,
}

impl CurrentIndex {
    /// Walks `doc` once, mirroring what [`build_source_index`] records.
    pub fn build(doc: &Snapshot) -> Self {
        let texts = doc
            .text_leaves()
            .map(|leaf| normalize_text(leaf.value))
            .collect();
        let link_urls = doc
            .anchors()
            .filter_map(|anchor| resolve_anchor_url(doc.base_url(), anchor.href))
            .collect();
        Self { texts, link_urls }
    }
}

/// Resolves and normalizes one anchor; `None` when its URL cannot be resolved.
pub fn link_entry(base: &Url, anchor: &AnchorNode<'_>) -> Option<LinkEntry> {
    let url = resolve_anchor_url(base, anchor.href)?;
    Some(LinkEntry {
        url,
        text: normalize_text(&anchor.text),
        label: collapse_whitespace(&anchor.text),
    })
}

pub(crate) fn resolve_anchor_url(base: &Url, href: &str) -> Option<String> {
    match resolve_absolute_url(base, href) {
        Ok(url) => Some(url.into()),
        Err(err) => {
            tracing::warn!(error = %err, "treating unresolvable link as unmatched");
            None
        }
    }
}

/// Deduplicated candidate filenames of one image, `src` first.
pub fn image_candidate_names(base: &Url, image: &ImageNode<'_>) -> IndexSet<String> {
    let mut names = IndexSet::new();
    if let Some(src) = image.src {
        names.extend(final_path_segment(base, src));
    }
    if let Some(srcset) = image.srcset {
        names.extend(srcset_candidate_names(base, srcset));
    }
    names
}
