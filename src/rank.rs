//! Priority and legend-group ranking, plus the filtered/sorted views the
//! presentation layer asks for.
//!
//! Every function here is a pure function of its inputs; views are recomputed on
//! each call rather than cached.

use crate::normalize::normalize_text;
use crate::record::{Category, DiffKind, DifferenceRecord, UNKNOWN_GROUP_ORDER};
use std::cmp::Ordering;

/// Fixed priority of a difference kind; lower sorts first.
pub fn priority_of(kind: DiffKind) -> u8 {
    match kind {
        DiffKind::HeadingChange => 1,
        DiffKind::NewLink => 2,
        DiffKind::ParagraphChange => 3,
        DiffKind::GeneralTextChange => 4,
        DiffKind::RemovedText => 5,
        DiffKind::RemovedLink => 6,
        DiffKind::ModifiedLink => 7,
        DiffKind::CtaTextChange => 8,
        DiffKind::ImageChange => 9,
    }
}

/// Legend position of a category; both link categories share slot 2.
pub fn group_order_of(category: Category) -> u8 {
    match category {
        Category::Heading => 1,
        Category::NewLink | Category::ModifiedLink => 2,
        Category::CtaText => 3,
        Category::Paragraph => 4,
        Category::Image => 5,
        Category::GeneralText => 6,
        Category::Removed => 7,
    }
}

/// Legend group order for a raw category tag, including the `LINK` grouping.
///
/// Unknown tags map to 99.
pub fn group_order_of_tag(tag: &str) -> u8 {
    match tag {
        "LINK" => 2,
        _ => CategoryFilter::parse(tag)
            .and_then(|filter| match filter {
                CategoryFilter::Only(category) => Some(group_order_of(category)),
                _ => None,
            })
            .unwrap_or(UNKNOWN_GROUP_ORDER),
    }
}

/// Stamps each record with its priority and group order.
pub fn assign_ranks(records: &mut [DifferenceRecord]) {
    for record in records {
        record.priority = priority_of(record.kind);
        record.group_order = group_order_of(record.category);
    }
}

/// Legend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No filter.
    All,
    /// New and modified links.
    Links,
    /// A single category.
    Only(Category),
}

impl CategoryFilter {
    /// Parses a legend tag such as `HEADING`, `LINK` or `ALL`.
    pub fn parse(tag: &str) -> Option<Self> {
        let filter = match tag {
            "ALL" => Self::All,
            "LINK" => Self::Links,
            "HEADING" => Self::Only(Category::Heading),
            "NEW_LINK" => Self::Only(Category::NewLink),
            "MODIFIED_LINK" => Self::Only(Category::ModifiedLink),
            "CTA_TEXT" => Self::Only(Category::CtaText),
            "PARAGRAPH" => Self::Only(Category::Paragraph),
            "IMAGE" => Self::Only(Category::Image),
            "GENERAL_TEXT" => Self::Only(Category::GeneralText),
            "REMOVED" => Self::Only(Category::Removed),
            _ => return None,
        };
        Some(filter)
    }

    /// True when a record of `category` passes the filter.
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Links => category.is_link(),
            Self::Only(wanted) => wanted == category,
        }
    }
}

/// Records stably sorted by priority, ascending.
pub fn default_order(records: &[DifferenceRecord]) -> Vec<DifferenceRecord> {
    let mut ordered = records.to_vec();
    ordered.sort_by_key(|record| record.priority);
    ordered
}

/// Records passing `filter`, stably sorted by legend group, then priority.
pub fn grouped_order(records: &[DifferenceRecord], filter: CategoryFilter) -> Vec<DifferenceRecord> {
    let mut ordered: Vec<DifferenceRecord> = records
        .iter()
        .filter(|record| filter.matches(record.category))
        .cloned()
        .collect();
    ordered.sort_by_key(|record| (record.group_order, record.priority));
    ordered
}

/// The view the legend shows: priority order for `All`, grouped order otherwise.
pub fn legend_view(records: &[DifferenceRecord], filter: CategoryFilter) -> Vec<DifferenceRecord> {
    match filter {
        CategoryFilter::All => default_order(records),
        _ => grouped_order(records, filter),
    }
}

/// Normalized text of a summary row: badge, icon, kind and detail.
pub fn row_text(record: &DifferenceRecord) -> String {
    normalize_text(&format!(
        "{} {} {} {}",
        record.severity().label(),
        record.category.icon(),
        record.kind.label(),
        record.detail
    ))
}

/// Records whose row text contains the normalized `query`, order kept.
pub fn search(records: &[DifferenceRecord], query: &str) -> Vec<DifferenceRecord> {
    let query = normalize_text(query);
    records
        .iter()
        .filter(|record| row_text(record).contains(&query))
        .cloned()
        .collect()
}

/// Summary table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    /// Numeric priority.
    Priority,
    /// Category icon, then tag.
    Category,
    /// Kind label.
    Kind,
    /// Detail message.
    Detail,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Stable sort of `records` by a single column.
pub fn sort_by_column(records: &mut [DifferenceRecord], column: SortColumn, direction: Direction) {
    records.sort_by(|a, b| {
        let ordering = compare_column(a, b, column);
        match direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });
}

fn compare_column(a: &DifferenceRecord, b: &DifferenceRecord, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Priority => a.priority.cmp(&b.priority),
        _ => cell_text(a, column).cmp(&cell_text(b, column)),
    }
}

/// Text cells compare case-insensitively, whitespace collapsed.
fn cell_text(record: &DifferenceRecord, column: SortColumn) -> String {
    match column {
        SortColumn::Priority => record.priority.to_string(),
        SortColumn::Category => {
            normalize_text(&format!("{} {}", record.category.icon(), record.category.tag()))
        }
        SortColumn::Kind => normalize_text(record.kind.label()),
        SortColumn::Detail => normalize_text(&record.detail),
    }
}
