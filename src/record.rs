//! Difference records and the fixed kind/category/priority tables.

use crate::snapshot::ElementHandle;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::fmt;

/// Priority assigned to anything missing from the kind table.
pub const UNKNOWN_PRIORITY: u8 = 99;
/// Group order assigned to anything missing from the legend table.
pub const UNKNOWN_GROUP_ORDER: u8 = 99;

/// Precise classification of one content difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiffKind {
    /// Text under an `h1`-`h6` no longer matches any source text.
    #[serde(rename = "Heading Change")]
    HeadingChange,
    /// Link whose URL and text are both unknown to the source.
    #[serde(rename = "New Link")]
    NewLink,
    /// Text directly under a `p` no longer matches any source text.
    #[serde(rename = "Paragraph Change")]
    ParagraphChange,
    /// Unmatched text outside headings, paragraphs, links and buttons.
    #[serde(rename = "General Text Change")]
    GeneralTextChange,
    /// Source text that appears nowhere in the current page.
    #[serde(rename = "Removed Text")]
    RemovedText,
    /// Source link URL that no current anchor resolves to.
    #[serde(rename = "Removed Link")]
    RemovedLink,
    /// Known link text now pointing somewhere else.
    #[serde(rename = "Modified Link")]
    ModifiedLink,
    /// Known link URL now carrying different text.
    #[serde(rename = "CTA Text Change")]
    CtaTextChange,
    /// Image none of whose candidate filenames the source knew.
    #[serde(rename = "Image Change")]
    ImageChange,
}

impl DiffKind {
    /// Every kind, in priority order.
    pub const ALL: [DiffKind; 9] = [
        DiffKind::HeadingChange,
        DiffKind::NewLink,
        DiffKind::ParagraphChange,
        DiffKind::GeneralTextChange,
        DiffKind::RemovedText,
        DiffKind::RemovedLink,
        DiffKind::ModifiedLink,
        DiffKind::CtaTextChange,
        DiffKind::ImageChange,
    ];

    /// Human-readable label, e.g. `Heading Change`.
    pub fn label(self) -> &'static str {
        match self {
            Self::HeadingChange => "Heading Change",
            Self::NewLink => "New Link",
            Self::ParagraphChange => "Paragraph Change",
            Self::GeneralTextChange => "General Text Change",
            Self::RemovedText => "Removed Text",
            Self::RemovedLink => "Removed Link",
            Self::ModifiedLink => "Modified Link",
            Self::CtaTextChange => "CTA Text Change",
            Self::ImageChange => "Image Change",
        }
    }

    /// Fixed visual category of this kind.
    pub fn category(self) -> Category {
        match self {
            Self::HeadingChange => Category::Heading,
            Self::NewLink => Category::NewLink,
            Self::ParagraphChange => Category::Paragraph,
            Self::GeneralTextChange => Category::GeneralText,
            Self::RemovedText | Self::RemovedLink => Category::Removed,
            Self::ModifiedLink => Category::ModifiedLink,
            Self::CtaTextChange => Category::CtaText,
            Self::ImageChange => Category::Image,
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse visual/filter grouping of difference kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Heading text.
    Heading,
    /// Link unknown to the source.
    NewLink,
    /// Paragraph text.
    Paragraph,
    /// Any other text.
    GeneralText,
    /// Content present only in the source.
    Removed,
    /// Link with a changed destination.
    ModifiedLink,
    /// Link with changed text.
    CtaText,
    /// Image.
    Image,
}

impl Category {
    /// Wire tag, e.g. `MODIFIED_LINK`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Heading => "HEADING",
            Self::NewLink => "NEW_LINK",
            Self::Paragraph => "PARAGRAPH",
            Self::GeneralText => "GENERAL_TEXT",
            Self::Removed => "REMOVED",
            Self::ModifiedLink => "MODIFIED_LINK",
            Self::CtaText => "CTA_TEXT",
            Self::Image => "IMAGE",
        }
    }

    /// True for the categories the legend groups under "Links".
    pub fn is_link(self) -> bool {
        matches!(self, Self::NewLink | Self::ModifiedLink)
    }

    /// Legend icon.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Heading => "✏️",
            Self::Paragraph => "📄",
            Self::CtaText => "💬",
            Self::ModifiedLink => "↔️",
            Self::NewLink => "✨",
            Self::Image => "🖼️",
            Self::GeneralText => "📝",
            Self::Removed => "❌",
        }
    }

    /// Highlight colour; both link categories share the link colour.
    pub fn color(self) -> &'static str {
        match self {
            Self::Heading => "#FFC300",
            Self::Paragraph => "#FFFAA0",
            Self::CtaText => "#DA70D6",
            Self::NewLink | Self::ModifiedLink => "#FF4136",
            Self::Image => "#82CA9D",
            Self::GeneralText => "#E0E0E0",
            Self::Removed => "#B0C4DE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Badge derived from priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Priorities 1 through 6.
    High,
    /// Priority 7.
    Med,
    /// Everything else.
    Low,
}

impl Severity {
    /// Buckets a priority value.
    pub fn from_priority(priority: u8) -> Self {
        match priority {
            0..=6 => Self::High,
            7 => Self::Med,
            _ => Self::Low,
        }
    }

    /// Badge text.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Med => "MED",
            Self::Low => "LOW",
        }
    }
}

/// One reported content change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifferenceRecord {
    /// 1-based creation order within the run.
    pub sequence_id: u32,
    /// Element in the current snapshot; `None` for removals.
    pub anchor: Option<ElementHandle>,
    /// Precise classification.
    pub kind: DiffKind,
    /// Human-readable detail.
    pub detail: String,
    /// Always `kind.category()`.
    pub category: Category,
    /// Filled in by the ranker.
    pub priority: u8,
    /// Filled in by the ranker.
    pub group_order: u8,
}

impl DifferenceRecord {
    /// Creates an unranked record; priority and group order are set by the ranker.
    pub fn new(
        sequence_id: u32,
        anchor: Option<ElementHandle>,
        kind: DiffKind,
        detail: String,
    ) -> Self {
        Self {
            sequence_id,
            anchor,
            kind,
            detail,
            category: kind.category(),
            priority: UNKNOWN_PRIORITY,
            group_order: UNKNOWN_GROUP_ORDER,
        }
    }

    /// Identifier the presentation layer assigns to the anchor element.
    pub fn element_id(&self) -> String {
        element_id(self.sequence_id)
    }

    /// Priority badge.
    pub fn severity(&self) -> Severity {
        Severity::from_priority(self.priority)
    }
}

/// Per-run record counter; ids start at 1 and never repeat within a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSequence {
    last: u32,
}

impl RecordSequence {
    /// Starts a fresh run at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the next record, consuming one sequence id.
    pub fn emit(
        &mut self,
        anchor: Option<ElementHandle>,
        kind: DiffKind,
        detail: String,
    ) -> DifferenceRecord {
        self.last += 1;
        tracing::debug!(sequence_id = self.last, kind = %kind, detail = %detail, "difference");
        DifferenceRecord::new(self.last, anchor, kind, detail)
    }

    /// High-water mark: the number of records emitted so far.
    pub fn count(&self) -> u32 {
        self.last
    }

    /// Back to zero for the next run.
    pub fn reset(&mut self) {
        self.last = 0;
    }
}

/// `pce-element-<sequence_id>`, the id stamped on marked elements.
pub fn element_id(sequence_id: u32) -> String {
    format!("pce-element-{sequence_id}")
}

impl Serialize for DifferenceRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("DifferenceRecord", 8)?;
        state.serialize_field("sequence_id", &self.sequence_id)?;
        let element_id = self.anchor.map(|_| self.element_id());
        state.serialize_field("element_id", &element_id)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("detail", &self.detail)?;
        state.serialize_field("category", &self.category)?;
        state.serialize_field("priority", &self.priority)?;
        state.serialize_field("severity", &self.severity())?;
        state.serialize_field("group_order", &self.group_order)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn kind_category_table_is_fixed() {
        let categories: Vec<Category> = DiffKind::ALL.iter().map(|k| k.category()).collect();
        assert_eq!(
            categories,
            vec![
                Category::Heading,
                Category::NewLink,
                Category::Paragraph,
                Category::GeneralText,
                Category::Removed,
                Category::Removed,
                Category::ModifiedLink,
                Category::CtaText,
                Category::Image,
            ]
        );
    }

    #[test]
    fn only_new_and_modified_links_are_link_category() {
        let links: Vec<DiffKind> = DiffKind::ALL
            .into_iter()
            .filter(|k| k.category().is_link())
            .collect();
        assert_eq!(links, vec![DiffKind::NewLink, DiffKind::ModifiedLink]);
    }

    #[test]
    fn severity_buckets() {
        assert_eq!(Severity::from_priority(1), Severity::High);
        assert_eq!(Severity::from_priority(6), Severity::High);
        assert_eq!(Severity::from_priority(7), Severity::Med);
        assert_eq!(Severity::from_priority(8), Severity::Low);
        assert_eq!(Severity::from_priority(UNKNOWN_PRIORITY), Severity::Low);
    }

    #[test]
    fn sequence_ids_are_one_based_and_monotonic() {
        let mut sequence = RecordSequence::new();
        let a = sequence.emit(None, DiffKind::RemovedText, "a".into());
        let b = sequence.emit(None, DiffKind::RemovedLink, "b".into());
        assert_eq!((a.sequence_id, b.sequence_id), (1, 2));
        assert_eq!(sequence.count(), 2);
        sequence.reset();
        assert_eq!(sequence.emit(None, DiffKind::ImageChange, "c".into()).sequence_id, 1);
    }

    #[test]
    fn serializes_labels_and_tags() {
        let mut record = DifferenceRecord::new(3, None, DiffKind::CtaTextChange, "x".into());
        record.priority = 8;
        record.group_order = 3;
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "CTA Text Change");
        assert_eq!(json["category"], "CTA_TEXT");
        assert_eq!(json["severity"], "LOW");
        assert_eq!(json["element_id"], serde_json::Value::Null);
    }
}
