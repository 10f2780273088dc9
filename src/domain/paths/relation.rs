//! Containment checks between the audit roots

use std::path::Path;

use super::normalize::{absolutize, common_prefix_len, segments};
use crate::domain::error::RootsError;

/// How one path relates to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRelation {
    /// Neither path contains the other
    Outside,
    /// Both denote the same location
    Equal,
    /// The first path strictly contains the second
    Contains,
    /// The first path lies strictly inside the second
    ContainedBy,
}

impl PathRelation {
    /// Relation of `path` to `other`, compared case-insensitively after
    /// both are made absolute and normalized.
    pub fn between(path: &Path, other: &Path) -> Self {
        let a = segments(&absolutize(path));
        let b = segments(&absolutize(other));
        let common = common_prefix_len(&a, &b);

        match (common == a.len(), common == b.len()) {
            (true, true) => Self::Equal,
            (true, false) => Self::Contains,
            (false, true) => Self::ContainedBy,
            (false, false) => Self::Outside,
        }
    }
}

/// Reject an output root that is, or lies inside, the input root.
///
/// Accepted files would otherwise land in the tree being audited.
pub fn validate_distinct_roots(output_root: &Path, input_root: &Path) -> Result<(), RootsError> {
    match PathRelation::between(output_root, input_root) {
        PathRelation::Equal | PathRelation::ContainedBy => Err(RootsError::OutputInsideInput {
            output: output_root.to_path_buf(),
            input: input_root.to_path_buf(),
        }),
        PathRelation::Outside | PathRelation::Contains => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_output_inside_input() {
        let err = validate_distinct_roots(Path::new("/a/b"), Path::new("/a")).unwrap_err();
        assert!(matches!(err, RootsError::OutputInsideInput { .. }));
    }

    #[test]
    fn accepts_unrelated_output() {
        assert!(validate_distinct_roots(Path::new("/x"), Path::new("/a")).is_ok());
    }

    #[test]
    fn rejects_same_directory() {
        assert!(validate_distinct_roots(Path::new("/a"), Path::new("/a")).is_err());
        assert!(validate_distinct_roots(Path::new("/a/"), Path::new("/a/./")).is_err());
    }

    #[test]
    fn rejects_case_variant_of_input() {
        assert!(validate_distinct_roots(Path::new("/Music/Accepted"), Path::new("/music")).is_err());
    }

    #[test]
    fn accepts_output_that_contains_input() {
        assert!(validate_distinct_roots(Path::new("/a"), Path::new("/a/inbox")).is_ok());
    }

    #[test]
    fn sibling_with_shared_name_prefix_is_outside() {
        assert!(validate_distinct_roots(Path::new("/music2"), Path::new("/music")).is_ok());
    }

    #[test]
    fn relation_variants() {
        let rel = |a: &str, b: &str| PathRelation::between(Path::new(a), Path::new(b));
        assert_eq!(rel("/a", "/a"), PathRelation::Equal);
        assert_eq!(rel("/a", "/a/b"), PathRelation::Contains);
        assert_eq!(rel("/a/b", "/a"), PathRelation::ContainedBy);
        assert_eq!(rel("/a/b", "/a/c"), PathRelation::Outside);
    }

    #[test]
    fn relation_resolves_dot_segments() {
        assert_eq!(
            PathRelation::between(Path::new("/a/b/../c"), Path::new("/a")),
            PathRelation::ContainedBy
        );
    }
}
