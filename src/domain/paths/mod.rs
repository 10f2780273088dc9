//! Path safety: root validation and relative path computation

mod normalize;
mod relation;
mod relative;

pub use normalize::{absolutize, normalize};
pub use relation::{validate_distinct_roots, PathRelation};
pub use relative::relative_path;
