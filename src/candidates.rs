//! Candidate filename generation for ambiguous dataset identifiers
//!
//! Callers refer to datasets loosely: a bare base name (`foo`), a suffixed
//! name (`foo_raw`, `foo_curated`) or a full filename (`foo_raw.csv`). This
//! module turns one such identifier into the ordered list of filenames the
//! resolver probes against the store, most-likely-intended first.
//!
//! The generator is a heuristic best-effort matcher: it trades extra
//! existence checks for tolerance of varied caller input. The only ordering
//! promise is the generation order below, with first-seen deduplication.

use crate::keys::split_name_ext;
use std::collections::HashSet;

/// Suffix variants inserted between stem and extension when guessing
const DATA_SUFFIXES: [&str; 2] = ["_raw", "_curated"];

/// Extensions tried when the identifier has none
const DEFAULT_EXTENSIONS: [&str; 2] = [".csv", ".zip"];

/// Generate the ordered, deduplicated candidate filenames for an identifier.
///
/// Generation order:
/// 1. the identifier exactly as given;
/// 2. if it has no extension, `<identifier>.csv` and `<identifier>.zip`;
/// 3. for `_raw` and `_curated`: the suffix inserted before the extension,
///    or (when extensionless) appended bare and with `.csv`/`.zip`;
/// 4. if the identifier (or its stem) already ends with a data suffix, the
///    suffix-stripped variants.
pub fn candidate_filenames(identifier: &str) -> Vec<String> {
    let (stem, ext) = split_name_ext(identifier);
    let mut out = Vec::new();

    // 1) exactly as provided
    out.push(identifier.to_string());

    // 2) common extensions when none was given
    if ext.is_none() {
        for e in DEFAULT_EXTENSIONS {
            out.push(format!("{identifier}{e}"));
        }
    }

    // 3) suffix inserted before the extension (or appended when there is none)
    for suffix in DATA_SUFFIXES {
        match ext {
            Some(ext) => out.push(format!("{stem}{suffix}{ext}")),
            None => {
                out.push(format!("{identifier}{suffix}"));
                for e in DEFAULT_EXTENSIONS {
                    out.push(format!("{identifier}{suffix}{e}"));
                }
            }
        }
    }

    // 4) the identifier already carries a suffix: try the stripped base too
    for suffix in DATA_SUFFIXES {
        if let Some(base) = identifier.strip_suffix(suffix) {
            out.push(base.to_string());
            out.push(format!("{base}.csv"));
            out.push(format!("{base}.zip"));
        }
        if let Some(ext) = ext {
            if let Some(base) = stem.strip_suffix(suffix) {
                out.push(format!("{base}{ext}"));
                out.push(base.to_string());
                out.push(format!("{base}.csv"));
            }
        }
    }

    // dedupe preserving first-seen order
    let mut seen = HashSet::new();
    out.retain(|c| seen.insert(c.clone()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_base_name() {
        assert_eq!(
            candidate_filenames("foo"),
            vec![
                "foo",
                "foo.csv",
                "foo.zip",
                "foo_raw",
                "foo_raw.csv",
                "foo_raw.zip",
                "foo_curated",
                "foo_curated.csv",
                "foo_curated.zip",
            ]
        );
    }

    #[test]
    fn test_full_filename_with_suffix() {
        assert_eq!(
            candidate_filenames("foo_raw.csv"),
            vec![
                "foo_raw.csv",
                "foo_raw_raw.csv",
                "foo_raw_curated.csv",
                "foo.csv",
                "foo",
            ]
        );
    }

    #[test]
    fn test_suffixed_base_without_extension() {
        let cands = candidate_filenames("bar_curated");
        assert_eq!(cands[0], "bar_curated");
        // step 2 variants follow immediately
        assert_eq!(&cands[1..3], &["bar_curated.csv", "bar_curated.zip"]);
        // stripped-base variants appear after the suffix insertions
        for expected in ["bar", "bar.csv", "bar.zip"] {
            assert!(cands.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn test_identifier_is_always_first() {
        for id in ["foo", "foo.csv", "foo_raw", "foo_raw.zip", "weird.name.txt"] {
            assert_eq!(candidate_filenames(id)[0], id);
        }
    }

    #[test]
    fn test_extensionless_relative_order() {
        let cands = candidate_filenames("bar");
        let pos = |s: &str| cands.iter().position(|c| c == s).unwrap();
        assert!(pos("bar") < pos("bar.csv"));
        assert!(pos("bar.csv") < pos("bar.zip"));
    }

    #[test]
    fn test_no_duplicates() {
        for id in ["foo", "foo.csv", "foo_raw", "foo_raw.csv", "a_curated.zip", "x_raw_raw"] {
            let cands = candidate_filenames(id);
            let unique: HashSet<_> = cands.iter().collect();
            assert_eq!(unique.len(), cands.len(), "duplicates for {id}: {cands:?}");
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(candidate_filenames("foo_raw"), candidate_filenames("foo_raw"));
    }
}
