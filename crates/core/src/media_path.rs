//! Allow-list guard for path-addressed media.
//!
//! Requested paths are normalised lexically (no filesystem access) and must
//! land inside one of the configured base directories. The check runs
//! before anything touches the disk, so a rejected request never reveals
//! whether the target exists.

use std::path::{Component, Path, PathBuf};

use crate::error::CoreError;

/// Resolve `.` and `..` without consulting the filesystem.
///
/// Returns `None` when `..` would climb above the start of the path.
pub fn normalize_lexically(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                out.pop();
                depth -= 1;
            }
            Component::Normal(part) => {
                out.push(part);
                depth += 1;
            }
        }
    }

    Some(out)
}

/// Whether `segment` can be used verbatim as one URL or path component:
/// non-empty ASCII letters, digits, `_` and `-`.
pub fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Set of directories media may be served from.
#[derive(Debug, Clone)]
pub struct MediaPathGuard {
    roots: Vec<PathBuf>,
}

impl MediaPathGuard {
    /// Roots should be absolute; relative requests are resolved against the
    /// first one.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let roots = roots
            .into_iter()
            .filter_map(|r| normalize_lexically(r.as_ref()))
            .filter(|r| !r.as_os_str().is_empty())
            .collect();
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Map a requested path onto an allowed location.
    ///
    /// Empty input is a validation error; anything that escapes the
    /// allow-list (including `..` tricks and foreign absolute paths) is
    /// [`CoreError::Forbidden`].
    pub fn resolve(&self, requested: &str) -> Result<PathBuf, CoreError> {
        let trimmed = requested.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation("Missing path parameter".to_string()));
        }
        if trimmed.contains('\0') {
            return Err(CoreError::Forbidden("Access denied".to_string()));
        }

        let requested = Path::new(trimmed);
        let candidate = match (requested.is_absolute(), self.roots.first()) {
            (true, _) => requested.to_path_buf(),
            (false, Some(base)) => base.join(requested),
            (false, None) => return Err(CoreError::Forbidden("Access denied".to_string())),
        };

        let normalized = normalize_lexically(&candidate)
            .ok_or_else(|| CoreError::Forbidden("Access denied".to_string()))?;

        if self.roots.iter().any(|root| normalized.starts_with(root)) {
            Ok(normalized)
        } else {
            Err(CoreError::Forbidden("Access denied".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn guard() -> MediaPathGuard {
        MediaPathGuard::new(["/srv/app/downloads", "/data/dataset"])
    }

    #[test]
    fn normalize_resolves_dots() {
        assert_eq!(
            normalize_lexically(Path::new("/a/./b/../c")),
            Some(PathBuf::from("/a/c"))
        );
        assert_eq!(normalize_lexically(Path::new("/a/../..")), None);
        assert_eq!(normalize_lexically(Path::new("../x")), None);
    }

    #[test]
    fn absolute_path_inside_root_allowed() {
        let p = guard().resolve("/data/dataset/improvised/V00_S0001_I00000001_P0.mp4");
        assert_eq!(
            p.unwrap(),
            PathBuf::from("/data/dataset/improvised/V00_S0001_I00000001_P0.mp4")
        );
    }

    #[test]
    fn relative_path_resolves_against_first_root() {
        let p = guard().resolve("V00_S0001_I00000001_P0.mp4").unwrap();
        assert_eq!(p, PathBuf::from("/srv/app/downloads/V00_S0001_I00000001_P0.mp4"));
    }

    #[test]
    fn dot_dot_escape_forbidden() {
        assert_matches!(guard().resolve("../../etc/passwd"), Err(CoreError::Forbidden(_)));
        assert_matches!(
            guard().resolve("/srv/app/downloads/../secrets.env"),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn dot_dot_that_stays_inside_is_allowed() {
        let p = guard().resolve("/data/dataset/a/../b.mp4").unwrap();
        assert_eq!(p, PathBuf::from("/data/dataset/b.mp4"));
    }

    #[test]
    fn foreign_absolute_path_forbidden() {
        assert_matches!(guard().resolve("/etc/passwd"), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn sibling_with_shared_prefix_forbidden() {
        assert_matches!(
            guard().resolve("/data/dataset-private/x.mp4"),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn empty_request_is_validation_error() {
        assert_matches!(guard().resolve("  "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn safe_segments() {
        assert!(is_safe_segment("improvised"));
        assert!(is_safe_segment("dev_2-b"));
        assert!(!is_safe_segment(""));
        assert!(!is_safe_segment(".."));
        assert!(!is_safe_segment("a/b"));
        assert!(!is_safe_segment("dev?x=1"));
    }

    #[test]
    fn no_roots_forbids_everything() {
        let empty = MediaPathGuard::new(Vec::<PathBuf>::new());
        assert_matches!(empty.resolve("a.mp4"), Err(CoreError::Forbidden(_)));
        assert_matches!(empty.resolve("/a.mp4"), Err(CoreError::Forbidden(_)));
    }
}
