//! Detection of source content that no longer exists in the current snapshot.

use crate::index::{CurrentIndex, SourceIndex};
use crate::record::{DiffKind, DifferenceRecord, RecordSequence};

/// Emits `Removed Text` for every source text no current leaf normalizes to, then
/// `Removed Link` for every source URL no current anchor resolves to.
///
/// Removal records never carry an anchor element.
pub fn detect_removals(
    current: &CurrentIndex,
    index: &SourceIndex,
    sequence: &mut RecordSequence,
) -> Vec<DifferenceRecord> {
    let removed_texts = index
        .texts
        .iter()
        .filter(|text| !current.texts.contains(*text))
        .map(|text| (DiffKind::RemovedText, format!("Text removed: \"{text}\"")));

    let removed_links = index
        .links_by_url
        .values()
        .filter(|entry| !current.link_urls.contains(&entry.url))
        .map(|entry| (DiffKind::RemovedLink, format!("URL removed: {}", entry.url)));

    removed_texts
        .chain(removed_links)
        .map(|(kind, detail)| sequence.emit(None, kind, detail))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_source_index;
    use crate::snapshot::{Snapshot, SnapshotOptions};
    use pretty_assertions::assert_eq;

    fn removals(source: &str, current: &str) -> Vec<DifferenceRecord> {
        let options = SnapshotOptions::default();
        let index = build_source_index(&Snapshot::parse(source, &options));
        let current = CurrentIndex::build(&Snapshot::parse(current, &options));
        detect_removals(&current, &index, &mut RecordSequence::new())
    }

    #[test]
    fn removed_text_carries_normalized_value() {
        let records = removals("<p>Welcome</p><div>Contact  US</div>", "<p>Welcome</p>");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, DiffKind::RemovedText);
        assert_eq!(records[0].detail, "Text removed: \"contact us\"");
        assert_eq!(records[0].anchor, None);
    }

    #[test]
    fn text_moved_elsewhere_is_not_removed() {
        let records = removals("<p>Contact us</p>", "<footer><span>contact us</span></footer>");
        assert!(records.is_empty());
    }

    #[test]
    fn removed_link_reported_by_url() {
        let records = removals(
            r#"<a href="/keep">Keep</a><a href="/gone">Gone</a>"#,
            r#"<a href="/keep">Keep</a><span>Gone</span>"#,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, DiffKind::RemovedLink);
        assert_eq!(records[0].detail, "URL removed: http://localhost/gone");
    }

    #[test]
    fn texts_come_before_links_in_source_order() {
        let records = removals(
            r#"<p>First</p><a href="/x">Link</a><p>Second</p>"#,
            "<body></body>",
        );
        let details: Vec<&str> = records.iter().map(|r| r.detail.as_str()).collect();
        assert_eq!(
            details,
            vec![
                "Text removed: \"first\"",
                "Text removed: \"link\"",
                "Text removed: \"second\"",
                "URL removed: http://localhost/x",
            ]
        );
    }
}
