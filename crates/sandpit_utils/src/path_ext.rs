use std::path::Path;

use sugar_path::SugarPath;

/// Helpers for logical project paths: forward-slash separated, relative to the
/// project root, never beginning with `/`.
///
/// Lexically resolve `.` and `..` segments in a logical path.
///
/// `..` segments that would climb above the project root are dropped rather
/// than preserved; a logical path cannot escape the file set it indexes.
pub fn normalize_virtual_path(path: &str) -> String {
  let normalized = Path::new(path).normalize();
  let mut out = String::with_capacity(path.len());

  for component in normalized.components() {
    let segment = component.as_os_str().to_string_lossy();
    if segment == ".." || segment == "." || segment.is_empty() {
      continue;
    }
    if !out.is_empty() {
      out.push('/');
    }
    out.push_str(&segment);
  }

  out
}

/// Resolve `specifier` against the directory of `importer`.
///
/// An empty importer means the specifier is already root-relative.
pub fn join_from_importer(importer: &str, specifier: &str) -> String {
  let dir = parent_dir(importer);
  if dir.is_empty() {
    normalize_virtual_path(specifier)
  } else {
    normalize_virtual_path(&format!("{dir}/{specifier}"))
  }
}

pub fn parent_dir(path: &str) -> &str {
  path.rfind('/').map_or("", |at| &path[..at])
}

pub fn extension(path: &str) -> Option<&str> {
  let file_name = path.rsplit('/').next()?;
  match file_name.rsplit_once('.') {
    Some((stem, ext)) if !stem.is_empty() => Some(ext),
    _ => None,
  }
}

pub fn file_name(path: &str) -> &str {
  path.rsplit('/').next().unwrap_or(path)
}

#[test]
fn test_normalize_virtual_path() {
  assert_eq!(normalize_virtual_path("./src/./main.ts"), "src/main.ts");
  assert_eq!(normalize_virtual_path("src/components/../lib/util.js"), "src/lib/util.js");
  assert_eq!(normalize_virtual_path("../../escape.js"), "escape.js");
}

#[test]
fn test_join_from_importer() {
  assert_eq!(join_from_importer("src/main.tsx", "./app"), "src/app");
  assert_eq!(join_from_importer("src/pages/home.tsx", "../lib/api.ts"), "src/lib/api.ts");
  assert_eq!(join_from_importer("", "./index.js"), "index.js");
}

#[test]
fn test_extension() {
  assert_eq!(extension("src/main.tsx"), Some("tsx"));
  assert_eq!(extension("LICENSE"), None);
  assert_eq!(extension(".gitignore"), None);
}
