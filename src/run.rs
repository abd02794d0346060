//! Orchestration of one comparison run: index, classify, detect removals, rank.

use crate::classify::classify;
use crate::config::CompareConfig;
use crate::error::CompareError;
use crate::index::{build_source_index, CurrentIndex, SourceIndex};
use crate::marks::{apply_marks, mark_instructions, MarkInstruction, MarkSink};
use crate::rank::{assign_ranks, default_order, legend_view, search, CategoryFilter};
use crate::record::{DifferenceRecord, RecordSequence};
use crate::removal::detect_removals;
use crate::snapshot::{Snapshot, SnapshotOptions};
use serde::Serialize;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Both snapshots were compared.
    Completed,
    /// The source snapshot was empty; nothing was compared.
    EmptySource,
}

/// Ordered outcome of one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    /// Terminal status.
    pub status: RunStatus,
    /// Records in default (priority) order.
    pub records: Vec<DifferenceRecord>,
    /// Marks for anchored records, in emission order.
    #[serde(skip)]
    pub marks: Vec<MarkInstruction>,
    count: u32,
}

impl Comparison {
    fn empty_source() -> Self {
        Self {
            status: RunStatus::EmptySource,
            records: Vec::new(),
            marks: Vec::new(),
            count: 0,
        }
    }

    /// Sequence high-water mark: how many records the run created.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Records passing `filter`, in the order the legend shows them.
    pub fn view(&self, filter: CategoryFilter) -> Vec<DifferenceRecord> {
        legend_view(&self.records, filter)
    }

    /// Legend view further narrowed by a free-text query.
    pub fn search(&self, filter: CategoryFilter, query: &str) -> Vec<DifferenceRecord> {
        search(&self.view(filter), query)
    }

    /// Replays every mark instruction against `current` through `sink`.
    pub fn apply_marks<S>(&self, current: &Snapshot, sink: &mut S) -> usize
    where
        S: MarkSink + ?Sized,
    {
        apply_marks(current, &self.marks, sink)
    }
}

/// Per-run state owned by the orchestrator.
///
/// Holds the walk options, the record counter and the source index. Call
/// [`ComparisonRun::reset`] before reusing a run for another pair of snapshots.
#[derive(Debug, Default)]
pub struct ComparisonRun {
    options: SnapshotOptions,
    sequence: RecordSequence,
    index: Option<SourceIndex>,
}

impl ComparisonRun {
    /// A run with default walk options, no index and the counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A run that parses source markup with `options`.
    pub fn with_options(options: SnapshotOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Walk options the source markup is parsed with; parse the current
    /// snapshot with the same ones.
    pub fn options(&self) -> &SnapshotOptions {
        &self.options
    }

    /// Zeroes the counter and drops any previously built source index.
    pub fn reset(&mut self) {
        self.sequence.reset();
        self.index = None;
    }

    /// Records created so far in this run.
    pub fn count(&self) -> u32 {
        self.sequence.count()
    }

    /// Source index of the last completed indexing phase, if any.
    pub fn source_index(&self) -> Option<&SourceIndex> {
        self.index.as_ref()
    }

    /// Parses `source_markup` and compares it against the `current` snapshot.
    ///
    /// Phases run strictly in order: source index, current index, classification,
    /// removal detection, ranking.
    pub fn compare(
        &mut self,
        source_markup: &str,
        current: &Snapshot,
    ) -> Result<Comparison, CompareError> {
        if source_markup.trim().is_empty() {
            return Err(CompareError::EmptyMarkup);
        }

        let source = Snapshot::parse(source_markup, &self.options);
        let index = self.index.insert(build_source_index(&source));
        if index.is_empty() {
            tracing::warn!("source snapshot has no text, links or images");
        }
        let current_index = CurrentIndex::build(current);

        let mut records = classify(current, index, &mut self.sequence);
        let marks = mark_instructions(&records);
        records.extend(detect_removals(&current_index, index, &mut self.sequence));

        assign_ranks(&mut records);
        let records = default_order(&records);

        tracing::info!(
            differences = records.len(),
            marks = marks.len(),
            "comparison complete"
        );
        Ok(Comparison {
            status: RunStatus::Completed,
            records,
            marks,
            count: self.sequence.count(),
        })
    }
}

/// One-shot comparison of two markup strings.
///
/// An empty source yields zero records with [`RunStatus::EmptySource`] rather than
/// an error, so callers can tell "no differences" from "nothing compared".
pub fn compare(config: &CompareConfig, source_markup: &str, current_markup: &str) -> Comparison {
    let mut run = ComparisonRun::with_options(SnapshotOptions::from_config(config));
    let current = Snapshot::parse(current_markup, run.options());
    match run.compare(source_markup, &current) {
        Ok(comparison) => comparison,
        Err(CompareError::EmptyMarkup) => {
            tracing::warn!("source snapshot is empty; skipping comparison");
            Comparison::empty_source()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Category, DiffKind};
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<!doctype html>
        <html><head><title>Shop</title></head><body>
          <h1>Welcome</h1>
          <p>Great deals every day.</p>
          <a href="/a">Buy</a>
          <a href="/old">Shop</a>
          <img src="/img/logo-v1.png" srcset="/img/logo-v1@2x.png 2x">
          <footer>Contact us</footer>
        </body></html>"#;

    fn summary(comparison: &Comparison) -> Vec<(DiffKind, u8)> {
        comparison
            .records
            .iter()
            .map(|r| (r.kind, r.priority))
            .collect()
    }

    #[test]
    fn identical_documents_have_no_differences() {
        let comparison = compare(&CompareConfig::default(), PAGE, PAGE);
        assert_eq!(comparison.status, RunStatus::Completed);
        assert!(comparison.records.is_empty());
        assert_eq!(comparison.count(), 0);
    }

    #[test]
    fn empty_source_is_distinguishable() {
        let comparison = compare(&CompareConfig::default(), "  \n", PAGE);
        assert_eq!(comparison.status, RunStatus::EmptySource);
        assert!(comparison.records.is_empty());

        let mut run = ComparisonRun::new();
        let current = Snapshot::parse(PAGE, run.options());
        let err = run.compare("", &current).unwrap_err();
        assert_eq!(err, CompareError::EmptyMarkup);
        assert!(run.source_index().is_none());
    }

    #[test]
    fn source_markup_is_parsed_with_run_options() {
        let options = SnapshotOptions {
            document_url: url::Url::parse("https://shop.example/catalog/").unwrap(),
            ..SnapshotOptions::default()
        };
        let mut run = ComparisonRun::with_options(options);
        let current = Snapshot::parse(r#"<a href="sale">Sale</a>"#, run.options());

        let comparison = run.compare(r#"<a href="sale">Sale</a>"#, &current).unwrap();
        assert!(comparison.records.is_empty());
        let index = run.source_index().unwrap();
        assert!(index
            .links_by_url
            .contains_key("https://shop.example/catalog/sale"));
    }

    #[test]
    fn markup_without_content_still_compares() {
        let mut run = ComparisonRun::new();
        let current = Snapshot::parse("<p>Hello</p>", run.options());
        let comparison = run.compare("<!-- nothing -->", &current).unwrap();
        assert_eq!(comparison.status, RunStatus::Completed);
        assert!(run.source_index().unwrap().is_empty());
        assert_eq!(summary(&comparison), vec![(DiffKind::ParagraphChange, 3)]);
    }

    #[test]
    fn mixed_changes_come_back_in_priority_order() {
        let current = PAGE
            .replace("<h1>Welcome</h1>", "<h1>Welcome Home</h1>")
            .replace(r#"<a href="/a">Buy</a>"#, r#"<a href="/a">Buy Now</a>"#)
            .replace(r#"href="/old""#, r#"href="/new""#)
            .replace("logo-v1.png\" srcset=\"/img/logo-v1@2x.png 2x\"", "logo-v2.png\"")
            .replace("<footer>Contact us</footer>", "");
        let comparison = compare(&CompareConfig::default(), PAGE, &current);

        assert_eq!(
            summary(&comparison),
            vec![
                (DiffKind::HeadingChange, 1),
                (DiffKind::RemovedText, 5),
                (DiffKind::RemovedText, 5),
                (DiffKind::RemovedText, 5),
                (DiffKind::RemovedLink, 6),
                (DiffKind::ModifiedLink, 7),
                (DiffKind::CtaTextChange, 8),
                (DiffKind::ImageChange, 9),
            ]
        );
        assert_eq!(comparison.count(), 8);
        assert_eq!(comparison.marks.len(), 4);
        assert!(comparison
            .records
            .iter()
            .filter(|r| r.category == Category::Removed)
            .all(|r| r.anchor.is_none()));
    }

    #[test]
    fn run_reset_restarts_sequence_and_drops_index() {
        let mut run = ComparisonRun::new();
        let current = Snapshot::parse("<p>Two</p>", run.options());

        let first = run.compare("<p>One</p>", &current).unwrap();
        assert_eq!(first.count(), 2);
        assert!(run.source_index().is_some());

        run.reset();
        assert_eq!(run.count(), 0);
        assert!(run.source_index().is_none());

        let second = run.compare("<p>One</p>", &current).unwrap();
        let ids: Vec<u32> = second.records.iter().map(|r| r.sequence_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn link_view_and_search() {
        let current = PAGE
            .replace(r#"href="/old""#, r#"href="/new""#)
            .replace("</footer>", "</footer><a href=\"/promo\">Promo</a>");
        let comparison = compare(&CompareConfig::default(), PAGE, &current);

        let links = comparison.view(CategoryFilter::Links);
        let kinds: Vec<DiffKind> = links.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![DiffKind::NewLink, DiffKind::ModifiedLink]);

        let found = comparison.search(CategoryFilter::All, "promo");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, DiffKind::NewLink);
    }
}
