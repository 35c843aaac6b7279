//! Route pattern and request path splitting.
//!
//! # Design Decisions
//! - Empty segments (leading, trailing or doubled `/`) are dropped
//! - Splitting stops right after the first `*` segment, so a catch-all is
//!   always the last segment of a pattern

/// Marker for a single-segment dynamic parameter (`:name`).
pub const PARAM_MARKER: char = ':';

/// Marker for a trailing catch-all parameter (`*name`).
pub const CATCH_ALL_MARKER: char = '*';

/// Split a pattern or request path into its segments.
pub fn split_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        segments.push(segment);
        if is_catch_all(segment) {
            break;
        }
    }
    segments
}

/// Returns true if the segment is a `:name` parameter.
pub fn is_param(segment: &str) -> bool {
    segment.starts_with(PARAM_MARKER)
}

/// Returns true if the segment is a `*name` catch-all.
pub fn is_catch_all(segment: &str) -> bool {
    segment.starts_with(CATCH_ALL_MARKER)
}

/// Returns true if the segment matches request segments dynamically.
pub fn is_wild(segment: &str) -> bool {
    is_param(segment) || is_catch_all(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_drops_empty_segments() {
        assert_eq!(split_segments("/p//go/doc/"), vec!["p", "go", "doc"]);
        assert!(split_segments("/").is_empty());
        assert!(split_segments("").is_empty());
    }

    #[test]
    fn test_split_stops_after_catch_all() {
        assert_eq!(
            split_segments("/static/*filepath/ignored/too"),
            vec!["static", "*filepath"]
        );
        assert_eq!(split_segments("/*"), vec!["*"]);
    }

    #[test]
    fn test_request_paths_split_the_same_way() {
        // A literal `*` in a request path also ends splitting.
        assert_eq!(split_segments("/a/*b/c"), vec!["a", "*b"]);
    }

    #[test]
    fn test_segment_kinds() {
        assert!(is_param(":lang"));
        assert!(is_catch_all("*filepath"));
        assert!(is_wild(":x") && is_wild("*"));
        assert!(!is_wild("doc"));
    }
}
