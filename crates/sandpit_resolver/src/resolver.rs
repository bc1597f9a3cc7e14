use sandpit_common::{FileSet, ResolvedId};
use sandpit_utils::path_ext::{join_from_importer, normalize_virtual_path};

#[inline]
fn is_http_url(s: &str) -> bool {
  s.starts_with("http://") || s.starts_with("https://") || s.starts_with("//")
}

#[inline]
fn is_data_url(s: &str) -> bool {
  s.trim_start().starts_with("data:")
}

/// Maps (importer, specifier) pairs onto the file set.
///
/// Stateless apart from the probing extension list; a single instance serves
/// every module of a bundle invocation.
#[derive(Debug)]
pub struct Resolver {
  extensions: &'static [&'static str],
}

impl Default for Resolver {
  fn default() -> Self {
    Self::new()
  }
}

impl Resolver {
  pub fn new() -> Self {
    Self { extensions: &["ts", "tsx", "jsx", "js", "mjs", "cjs", "json", "css"] }
  }

  /// Resolve `specifier` as imported from `importer` (`None` for the entry).
  ///
  /// Bare specifiers that do not name an in-memory path are classified
  /// external without touching the file set; the bundler keeps them
  /// unresolved so the import map can satisfy them at run time.
  pub fn resolve(&self, files: &FileSet, importer: Option<&str>, specifier: &str) -> ResolvedId {
    // URLs are external by definition, never file-set lookups.
    if is_http_url(specifier) || is_data_url(specifier) {
      return ResolvedId::external(specifier);
    }

    let is_relative = specifier.starts_with('.');
    let is_absolute = specifier.starts_with('/');

    if !is_relative && !is_absolute {
      // Looks like a package name, but an exact in-memory path stays internal.
      let as_path = normalize_virtual_path(specifier);
      if let Some(hit) = self.probe(files, &as_path) {
        return ResolvedId::internal(hit);
      }
      return ResolvedId::external(specifier);
    }

    let candidate = if is_absolute {
      normalize_virtual_path(specifier.trim_start_matches('/'))
    } else {
      join_from_importer(importer.unwrap_or(""), specifier)
    };

    match self.probe(files, &candidate) {
      Some(hit) => ResolvedId::internal(hit),
      // Missing internal files resolve anyway; loading degrades them to an
      // empty placeholder plus a warning instead of failing the build.
      None => ResolvedId::internal(candidate),
    }
  }

  /// Exact path, then extension probing, then directory index probing.
  fn probe(&self, files: &FileSet, candidate: &str) -> Option<String> {
    if candidate.is_empty() {
      return None;
    }
    if files.contains(candidate) {
      return Some(candidate.to_string());
    }
    for ext in self.extensions {
      let with_ext = format!("{candidate}.{ext}");
      if files.contains(&with_ext) {
        return Some(with_ext);
      }
    }
    for ext in self.extensions {
      let index = format!("{candidate}/index.{ext}");
      if files.contains(&index) {
        return Some(index);
      }
    }
    None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn files() -> FileSet {
    [
      ("src/main.tsx", "export {}"),
      ("src/lib/api.ts", "export const api = 1;"),
      ("src/lib/index.js", "export default 1;"),
      ("styles/app.css", "body {}"),
    ]
    .into_iter()
    .collect()
  }

  #[test]
  fn bare_specifiers_are_external() {
    let resolver = Resolver::new();
    let resolved = resolver.resolve(&files(), Some("src/main.tsx"), "react");
    assert!(resolved.is_external);
    assert_eq!(resolved.id.as_str(), "react");

    assert!(resolver.resolve(&files(), None, "@scope/pkg/deep").is_external);
  }

  #[test]
  fn urls_are_external() {
    let resolver = Resolver::new();
    assert!(resolver.resolve(&files(), None, "https://esm.sh/react@18").is_external);
    assert!(resolver.resolve(&files(), None, "data:text/javascript,1").is_external);
  }

  #[test]
  fn relative_specifiers_resolve_against_the_importer() {
    let resolver = Resolver::new();
    let resolved = resolver.resolve(&files(), Some("src/main.tsx"), "./lib/api");
    assert!(!resolved.is_external);
    assert_eq!(resolved.id.as_str(), "src/lib/api.ts");
  }

  #[test]
  fn directory_imports_fall_back_to_index() {
    let resolver = Resolver::new();
    let resolved = resolver.resolve(&files(), Some("src/main.tsx"), "./lib");
    assert_eq!(resolved.id.as_str(), "src/lib/index.js");
  }

  #[test]
  fn in_memory_paths_stay_internal_even_without_a_leading_dot() {
    let resolver = Resolver::new();
    let resolved = resolver.resolve(&files(), None, "styles/app.css");
    assert!(!resolved.is_external);
    assert_eq!(resolved.id.as_str(), "styles/app.css");
  }

  #[test]
  fn missing_relative_targets_resolve_to_their_candidate_path() {
    let resolver = Resolver::new();
    let resolved = resolver.resolve(&files(), Some("src/main.tsx"), "./missing");
    assert!(!resolved.is_external);
    assert_eq!(resolved.id.as_str(), "src/missing");
  }
}
