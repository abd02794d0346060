//! Marking instructions for the live document, applied after classification.
//!
//! Classification only records *what* should be marked. [`apply_marks`] replays
//! those instructions, in emission order, against whatever sink the presentation
//! layer registers.

use crate::record::{element_id, Category, DifferenceRecord};
use crate::snapshot::{ElementHandle, Snapshot};
use scraper::ElementRef;

/// Attribute set on every marked element.
pub const MARKED_ATTRIBUTE: &str = "data-pce-marked";
/// Value of [`MARKED_ATTRIBUTE`] on a marked element.
pub const MARKED_VALUE: &str = "true";
/// Border width, in pixels, drawn around changed links.
pub const LINK_BORDER_PX: u8 = 3;
/// Padding, in pixels, added inside the link border.
pub const LINK_PADDING_PX: u8 = 2;

/// Visual treatment for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Treatment {
    /// Fill the element's background.
    Background {
        /// CSS colour.
        color: &'static str,
    },
    /// Solid border around the element.
    Border {
        /// CSS colour.
        color: &'static str,
        /// Border width in pixels.
        width_px: u8,
        /// Inner padding in pixels.
        padding_px: u8,
    },
    /// Indicator inserted right after the element; the element itself is untouched.
    AdjacentMarker {
        /// CSS colour of the marker dot.
        color: &'static str,
    },
    /// Nothing to draw.
    None,
}

impl Treatment {
    /// Treatment the presentation layer applies for `category`.
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Heading | Category::Paragraph | Category::GeneralText | Category::CtaText => {
                Self::Background {
                    color: category.color(),
                }
            }
            Category::NewLink | Category::ModifiedLink => Self::Border {
                color: category.color(),
                width_px: LINK_BORDER_PX,
                padding_px: LINK_PADDING_PX,
            },
            Category::Image => Self::AdjacentMarker {
                color: category.color(),
            },
            Category::Removed => Self::None,
        }
    }
}

/// One pending mark for an element of the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkInstruction {
    /// Record that produced the mark.
    pub sequence_id: u32,
    /// Element to mark.
    pub element: ElementHandle,
    /// Unique id to stamp on the element.
    pub element_id: String,
    /// Attribute name and value flagging the element as diff-tagged.
    pub marked_attribute: (&'static str, &'static str),
    /// Record category.
    pub category: Category,
    /// How to draw it.
    pub treatment: Treatment,
}

impl MarkInstruction {
    /// True when the mark goes next to the element rather than on it.
    pub fn is_adjacent(&self) -> bool {
        matches!(self.treatment, Treatment::AdjacentMarker { .. })
    }

    /// Every attribute the sink stamps on the element: its `id` and the marked flag.
    pub fn attributes(&self) -> [(&str, &str); 2] {
        let (name, value) = self.marked_attribute;
        [("id", self.element_id.as_str()), (name, value)]
    }
}

/// Presentation-layer hooks invoked once per anchored record.
pub trait MarkSink {
    /// Tags and styles `element` itself.
    fn mark(&mut self, element: ElementRef<'_>, instruction: &MarkInstruction);

    /// Places an indicator next to `element`; used for images.
    fn mark_adjacent(&mut self, element: ElementRef<'_>, instruction: &MarkInstruction);
}

/// Mark instructions for every anchored record, in the order the records are given.
pub fn mark_instructions(records: &[DifferenceRecord]) -> Vec<MarkInstruction> {
    records
        .iter()
        .filter_map(|record| {
            let element = record.anchor?;
            Some(MarkInstruction {
                sequence_id: record.sequence_id,
                element,
                element_id: element_id(record.sequence_id),
                marked_attribute: (MARKED_ATTRIBUTE, MARKED_VALUE),
                category: record.category,
                treatment: Treatment::for_category(record.category),
            })
        })
        .collect()
}

/// Invokes the sink exactly once per instruction, in order.
///
/// Returns how many instructions reached the sink; handles that do not resolve in
/// `current` are skipped.
pub fn apply_marks<S>(current: &Snapshot, instructions: &[MarkInstruction], sink: &mut S) -> usize
where
    S: MarkSink + ?Sized,
{
    let mut applied = 0;
    for instruction in instructions {
        let Some(element) = current.element(instruction.element) else {
            tracing::warn!(
                sequence_id = instruction.sequence_id,
                "mark target not found in current snapshot"
            );
            continue;
        };
        if instruction.is_adjacent() {
            sink.mark_adjacent(element, instruction);
        } else {
            sink.mark(element, instruction);
        }
        applied += 1;
    }
    applied
}
