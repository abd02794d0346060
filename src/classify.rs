//! Classification of the current snapshot's text, links and images against the
//! source index.
//!
//! Records are emitted in walk order: every text leaf first, then every anchor,
//! then every image. Ranking happens later.

use crate::index::{image_candidate_names, link_entry, SourceIndex};
use crate::normalize::normalize_text;
use crate::record::{DiffKind, DifferenceRecord, RecordSequence};
use crate::snapshot::{AnchorNode, ImageNode, Snapshot, TextLeaf};

/// Emits a record for every text leaf, anchor and image of `current` that the
/// source index does not account for.
pub fn classify(
    current: &Snapshot,
    index: &SourceIndex,
    sequence: &mut RecordSequence,
) -> Vec<DifferenceRecord> {
    let mut records = Vec::new();

    for leaf in current.text_leaves() {
        if let Some((kind, detail)) = classify_text(&leaf, index) {
            records.push(sequence.emit(Some(current.handle(leaf.parent)), kind, detail));
        }
    }

    for anchor in current.anchors() {
        if let Some((kind, detail)) = classify_link(current, &anchor, index) {
            records.push(sequence.emit(Some(current.handle(anchor.element)), kind, detail));
        }
    }

    for image in current.images() {
        if let Some((kind, detail)) = classify_image(current, &image, index) {
            records.push(sequence.emit(Some(current.handle(image.element)), kind, detail));
        }
    }

    records
}

/// Unmatched text is reported by its immediate container: heading, paragraph, or
/// general. Text anywhere inside a link or button is left to link classification.
fn classify_text(leaf: &TextLeaf<'_>, index: &SourceIndex) -> Option<(DiffKind, String)> {
    if index.texts.contains(&normalize_text(leaf.value)) {
        return None;
    }
    let tag = leaf.parent_tag();
    let kind = match tag.as_str() {
        "H1" | "H2" | "H3" | "H4" | "H5" | "H6" => DiffKind::HeadingChange,
        "P" => DiffKind::ParagraphChange,
        _ if leaf.inside_link_or_button() => return None,
        _ => DiffKind::GeneralTextChange,
    };
    Some((kind, format!("Text changed in <{tag}>")))
}

/// URL identity wins over text identity: a known URL with new text is always a
/// CTA change, never a new or modified link.
fn classify_link(
    current: &Snapshot,
    anchor: &AnchorNode<'_>,
    index: &SourceIndex,
) -> Option<(DiffKind, String)> {
    let entry = link_entry(current.base_url(), anchor);
    let text = normalize_text(&anchor.text);

    if let Some(known) = entry
        .as_ref()
        .and_then(|entry| index.links_by_url.get(&entry.url))
    {
        if known.text == text {
            return None;
        }
        return Some((
            DiffKind::CtaTextChange,
            format!("Link text changed from \"{}\"", known.label),
        ));
    }

    if let Some(known) = index.links_by_text.get(&text) {
        return Some((
            DiffKind::ModifiedLink,
            format!("URL changed from: {}", known.url),
        ));
    }

    let shown = entry.map(|entry| entry.url).unwrap_or_else(|| anchor.href.to_string());
    Some((DiffKind::NewLink, format!("URL: {shown}")))
}

/// An image is known when any one of its candidate filenames is.
fn classify_image(
    current: &Snapshot,
    image: &ImageNode<'_>,
    index: &SourceIndex,
) -> Option<(DiffKind, String)> {
    let names = image_candidate_names(current.base_url(), image);
    if names.iter().any(|name| index.image_names.contains(name)) {
        return None;
    }
    let first = names.first().map(String::as_str).unwrap_or("N/A");
    Some((DiffKind::ImageChange, format!("Filename: {first}")))
}
