use arcstr::ArcStr;
use sandpit_common::{FileSet, CODE_EXTENSIONS};

/// Conventional entry paths, most specific first. The first present wins.
pub const ENTRY_CANDIDATES: &[&str] = &[
  "src/main.tsx",
  "src/main.ts",
  "src/main.jsx",
  "src/main.js",
  "src/index.tsx",
  "src/index.ts",
  "src/index.jsx",
  "src/index.js",
  "index.tsx",
  "index.ts",
  "index.jsx",
  "index.js",
  "main.tsx",
  "main.ts",
  "main.jsx",
  "main.js",
];

/// Pick the most plausible application entry point.
///
/// Deterministic and stable for a given file set: the conventional list is
/// fixed and the fallbacks follow file-set insertion order. An empty set is
/// the only case that yields `None`.
pub fn detect_entry(files: &FileSet) -> Option<ArcStr> {
  for candidate in ENTRY_CANDIDATES {
    if files.contains(candidate) {
      return Some(ArcStr::from(*candidate));
    }
  }

  // No conventional entry: first recognized code file, then, degraded, any
  // first key at all.
  files.first_with_extension(CODE_EXTENSIONS).cloned().or_else(|| files.first_path().cloned())
}
