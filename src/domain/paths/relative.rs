//! Relative path computation used to mirror the input tree on accept

use std::iter;
use std::path::{Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

use super::normalize::{absolutize, common_prefix_len, segments};

/// Compute the path of `target` relative to `base`.
///
/// Both paths are made absolute and normalized, split into segments on
/// either separator and compared case-insensitively. When the two share no
/// leading segment (different drives or roots) there is no safe relative
/// form and the absolute `target` is returned. Equal paths yield `.`.
///
/// A `target` written with a trailing separator is treated as a directory:
/// the result keeps a trailing separator when it descends at least as deep
/// as `base`.
pub fn relative_path(base: impl AsRef<Path>, target: impl AsRef<Path>) -> PathBuf {
    let target = target.as_ref();
    let is_directory = has_trailing_separator(target);

    let target_abs = absolutize(target);
    let base_segments = segments(&absolutize(base.as_ref()));
    let target_segments = segments(&target_abs);

    let common = common_prefix_len(&base_segments, &target_segments);
    if common == 0 {
        return target_abs;
    }

    let parts: Vec<&str> = iter::repeat("..")
        .take(base_segments.len() - common)
        .chain(target_segments[common..].iter().map(String::as_str))
        .collect();

    if parts.is_empty() {
        return PathBuf::from(".");
    }

    let mut relative = parts.join(MAIN_SEPARATOR_STR);
    if is_directory && target_segments.len() >= base_segments.len() {
        relative.push(MAIN_SEPARATOR);
    }

    PathBuf::from(relative)
}

fn has_trailing_separator(path: &Path) -> bool {
    path.to_string_lossy().ends_with(['/', '\\'])
}
