#![warn(missing_docs)]
//! Content diffing between two snapshots of a rendered web page.
//!
//! A *source* snapshot (the page as it was) is indexed once; the *current*
//! snapshot is then walked and every text leaf, link and image the source does not
//! account for becomes a [`DifferenceRecord`], as does every source text or link
//! missing from the current page. Records are ranked by a fixed priority and can be
//! regrouped by legend category.

pub mod classify;
pub mod config;
pub mod error;
pub mod index;
pub mod marks;
pub mod normalize;
pub mod rank;
pub mod record;
pub mod removal;
pub mod run;
pub mod snapshot;

pub use classify::classify;
pub use config::{Cli, CompareConfig};
pub use error::{CompareError, UrlError};
pub use index::{build_source_index, CurrentIndex, LinkEntry, SourceIndex};
pub use marks::{apply_marks, MarkInstruction, MarkSink, Treatment};
pub use normalize::{
    final_path_segment, normalize_text, resolve_absolute_url, srcset_candidate_names,
};
pub use rank::{
    default_order, group_order_of, grouped_order, priority_of, search, sort_by_column,
    CategoryFilter, Direction, SortColumn,
};
pub use record::{Category, DiffKind, DifferenceRecord, RecordSequence, Severity};
pub use removal::detect_removals;
pub use run::{compare, Comparison, ComparisonRun, RunStatus};
pub use snapshot::{ElementHandle, Snapshot, SnapshotOptions};

#[cfg(feature = "debug_logs")]
#[macro_export]
// Prints node-walk traces to stderr when the `debug_logs` feature is on.
macro_rules! debug_log {
        ($($arg:tt)*) => {
            eprintln!($($arg)*);
        };
    }
#[cfg(not(feature = "debug_logs"))]
#[macro_export]
// Compiles node-walk traces out entirely.
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}
