//! Discovery merge — reconciling scanned and replayed candidate URLs.
//!
//! Candidates come from two sources: a fresh scan artifact and the gist's
//! revision history over a trailing window. Both are newline-delimited
//! documents. The merge is an exact-string set union: no case folding, no
//! trailing-slash stripping. `http://a` and `http://a/` are two candidates.

use std::collections::BTreeSet;

/// Extract candidate URLs from one newline-delimited snapshot.
///
/// A line is a candidate iff it is non-empty after trimming and does not
/// start with `#`.
pub fn extract_candidates(snapshot: &str) -> impl Iterator<Item = &str> {
    snapshot
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Union scan-pass candidates with history-replay snapshots into one
/// deduplicated, ordered candidate set.
pub fn merge<'a, S, H>(scan: S, history_snapshots: H) -> BTreeSet<String>
where
    S: IntoIterator<Item = &'a str>,
    H: IntoIterator<Item = &'a str>,
{
    let mut candidates: BTreeSet<String> = scan
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect();
    for snapshot in history_snapshots {
        candidates.extend(extract_candidates(snapshot).map(str::to_owned));
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_skips_blank_and_comment_lines() {
        let snapshot = "https://a.example/sub\n\n  \n# comment\n  https://b.example/sub  \n";
        let candidates: Vec<_> = extract_candidates(snapshot).collect();
        assert_eq!(candidates, vec!["https://a.example/sub", "https://b.example/sub"]);
    }

    #[test]
    fn merge_unions_both_sources() {
        let merged = merge(
            ["https://a.example/sub"],
            ["https://b.example/sub\nhttps://c.example/sub"],
        );
        assert_eq!(merged.len(), 3);
        assert!(merged.contains("https://b.example/sub"));
    }

    #[test]
    fn merge_is_idempotent() {
        let scan = ["http://a", "http://b"];
        let history = ["http://b\nhttp://c"];
        let once = merge(scan, history);
        let twice = merge(scan, history);
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_does_not_normalize() {
        let merged = merge(["http://a"], ["http://a\nhttp://a/"]);
        // Trailing slash is a distinct candidate.
        assert_eq!(merged.len(), 2);
        assert!(merged.contains("http://a"));
        assert!(merged.contains("http://a/"));
    }

    #[test]
    fn merge_dedups_exact_matches_across_sources() {
        let merged = merge(["http://a"], ["http://a", "http://a"]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn merge_trims_scan_lines_too() {
        let merged = merge(["  http://a  ", "# skipped", ""], []);
        assert_eq!(merged.len(), 1);
        assert!(merged.contains("http://a"));
    }
}
