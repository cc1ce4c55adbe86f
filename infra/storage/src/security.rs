//! Path sanitization and sandboxed path resolution.
//!
//! Every namespace identifier and every fragment of a [`Location`] passes through the
//! configured [`Sanitizer`] and is then checked to be exactly one normal path component.
//! Whatever the sanitizer leaves behind, a resolved path can never climb out of the storage
//! area or point at it directly.

use crate::error::StorageError;
use crate::transform::Location;
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

const RESERVED_PREFIX: &str = "file_";
const RESERVED_NAMES: [&str; 4] = ["con", "prn", "aux", "nul"];
const RESERVED_NUMBERED: [&str; 2] = ["com", "lpt"];

/// Strategy applied to each path segment before it touches the filesystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sanitizer {
    /// Replaces the drive separator `:` with `_` and leaves everything else untouched.
    #[default]
    Lenient,
    /// Keeps only `[A-Za-z0-9_-]` and renames reserved device names.
    Strict,
}

impl Sanitizer {
    #[must_use]
    pub fn sanitize(self, input: &str) -> Cow<'_, str> {
        match self {
            Self::Lenient => sanitize_lenient(input),
            Self::Strict => Cow::Owned(sanitize_strict(input)),
        }
    }
}

impl std::str::FromStr for Sanitizer {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(StorageError::Misconfigured {
                message: format!("Unknown sanitizer '{other}'").into(),
                context: Some("Expected one of: lenient, strict".into()),
            }),
        }
    }
}

/// Replaces every `:` with `_`.
///
/// This alone is not traversal-safe; resolution additionally rejects `.`/`..` segments.
#[must_use]
pub fn sanitize_lenient(input: &str) -> Cow<'_, str> {
    if input.contains(':') { Cow::Owned(input.replace(':', "_")) } else { Cow::Borrowed(input) }
}

/// Strips every character outside `[A-Za-z0-9_-]`.
///
/// Results that are empty or begin with a reserved device name (`con`, `prn`, `aux`, `nul`,
/// `com<digit>`, `lpt<digit>`, case-insensitive) are prefixed with `file_`.
///
/// ```rust
/// use ggnet_storage::sanitize_strict;
///
/// assert_eq!(sanitize_strict("../../etc/passwd"), "etcpasswd");
/// assert_eq!(sanitize_strict("CONFIG.toml"), "file_CONFIGtoml");
/// assert_eq!(sanitize_strict(".."), "file_");
/// ```
#[must_use]
pub fn sanitize_strict(input: &str) -> String {
    let safe: String =
        input.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-').collect();

    if safe.is_empty() || is_reserved(&safe) { format!("{RESERVED_PREFIX}{safe}") } else { safe }
}

/// Case-insensitive prefix match against platform device names.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();

    RESERVED_NAMES.iter().any(|r| lower.starts_with(r))
        || RESERVED_NUMBERED.iter().any(|r| {
            lower.strip_prefix(r).is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        })
}

/// `<storage>/<id>`
pub(crate) fn namespace_path(
    storage: &Path,
    sanitizer: Sanitizer,
    id: &str,
) -> Result<PathBuf, StorageError> {
    let mut path = storage.to_path_buf();
    push_segment(&mut path, sanitizer, id)?;
    Ok(path)
}

/// `<storage>/<id>/<sharded path...>/<leaf...>`
pub(crate) fn object_path(
    storage: &Path,
    sanitizer: Sanitizer,
    id: &str,
    location: &Location,
) -> Result<PathBuf, StorageError> {
    let mut path = namespace_path(storage, sanitizer, id)?;
    for segment in location.segments() {
        push_segment(&mut path, sanitizer, segment)?;
    }
    for segment in location.leaf_name().split('/') {
        push_segment(&mut path, sanitizer, segment)?;
    }
    Ok(path)
}

/// `<storage>/<id>/<first shard segment>`
pub(crate) fn prefix_bucket_path(
    storage: &Path,
    sanitizer: Sanitizer,
    id: &str,
    location: &Location,
) -> Result<PathBuf, StorageError> {
    let mut path = namespace_path(storage, sanitizer, id)?;
    push_segment(&mut path, sanitizer, location.first_shard_segment())?;
    Ok(path)
}

fn push_segment(path: &mut PathBuf, sanitizer: Sanitizer, raw: &str) -> Result<(), StorageError> {
    let clean = sanitizer.sanitize(raw);
    let mut components = Path::new(clean.as_ref()).components();

    match (components.next(), components.next()) {
        (Some(Component::Normal(segment)), None) => {
            path.push(segment);
            Ok(())
        },
        (None, _) => Err(StorageError::PathTraversalAttempt {
            message: format!("'{raw}'").into(),
            context: Some("Empty path segment".into()),
        }),
        _ => Err(StorageError::PathTraversalAttempt {
            message: format!("'{raw}'").into(),
            context: Some("Segment must resolve to a single directory entry".into()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{CasTransform, PathTransform};

    #[test]
    fn lenient_only_touches_colons() {
        assert_eq!(sanitize_lenient("peer:3000"), "peer_3000");
        assert_eq!(sanitize_lenient("a-b.c"), "a-b.c");
        assert!(matches!(sanitize_lenient("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn strict_strips_and_renames() {
        assert_eq!(sanitize_strict("hello world!.txt"), "helloworldtxt");
        assert_eq!(sanitize_strict("aux"), "file_aux");
        assert_eq!(sanitize_strict("Com7"), "file_Com7");
        assert_eq!(sanitize_strict("command"), "command");
        assert_eq!(sanitize_strict("lpt"), "lpt");
        assert_eq!(sanitize_strict(""), "file_");
    }

    #[test]
    fn reserved_detection_is_case_insensitive() {
        assert!(is_reserved("CON"));
        assert!(is_reserved("nul_device"));
        assert!(is_reserved("LPT1"));
        assert!(!is_reserved("icon"));
        assert!(!is_reserved("peer_a"));
    }

    #[test]
    fn object_path_layout() {
        let loc = CasTransform.transform("abc");
        let path = object_path(Path::new("net_storage"), Sanitizer::Lenient, "peer:A", &loc)
            .unwrap();

        let expected: PathBuf = ["net_storage", "peer_A"]
            .into_iter()
            .chain(loc.segments())
            .chain(std::iter::once(loc.leaf_name()))
            .collect();
        assert_eq!(path, expected);
    }

    #[test]
    fn lenient_rejects_traversal_segments() {
        let storage = Path::new("root_storage");
        for bad in ["..", ".", ""] {
            let loc = Location::new(bad, "leaf");
            assert!(matches!(
                object_path(storage, Sanitizer::Lenient, "id", &loc),
                Err(StorageError::PathTraversalAttempt { .. })
            ));
            assert!(namespace_path(storage, Sanitizer::Lenient, bad).is_err());
        }

        let loc = Location::new("ok/../../escape", "leaf");
        assert!(object_path(storage, Sanitizer::Lenient, "id", &loc).is_err());
    }

    #[test]
    fn strict_neutralizes_traversal_segments() {
        let storage = Path::new("root_storage");
        let loc = Location::new("../..", "../secret");

        let path = object_path(storage, Sanitizer::Strict, "..", &loc).unwrap();

        assert!(path.starts_with(storage));
        assert!(path.components().all(|c| !matches!(c, Component::ParentDir)));
    }

    #[test]
    fn sanitizer_parses_names() {
        assert_eq!("STRICT".parse::<Sanitizer>().unwrap(), Sanitizer::Strict);
        assert!(matches!("loose".parse::<Sanitizer>(), Err(StorageError::Misconfigured { .. })));
    }
}
