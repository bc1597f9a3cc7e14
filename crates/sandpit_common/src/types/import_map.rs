use sandpit_utils::indexmap::FxIndexMap;
use serde::Serialize;

use crate::types::package_manifest::strip_semver_range;

/// External CDN origin used for bare package specifiers.
///
/// The `{host}/{name}@{version}` mapping is a best-effort guess with no
/// verification that the package exists there; the intended audience is
/// casual and AI-generated prototypes, not production dependency resolution.
pub const CDN_HOST: &str = "https://esm.sh";

pub fn cdn_url(name: &str, range: &str) -> String {
  format!("{CDN_HOST}/{name}@{}", strip_semver_range(range))
}

/// Document-level import map: specifier to concrete fetchable URL.
///
/// Built fresh on every synthesis pass and never persisted. Serialized as the
/// standard `{ "imports": { ... } }` object.
#[derive(Debug, Default, Serialize)]
pub struct ImportMap {
  pub imports: FxIndexMap<String, String>,
}

impl ImportMap {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert or overwrite a mapping.
  pub fn insert(&mut self, specifier: impl Into<String>, url: impl Into<String>) {
    self.imports.insert(specifier.into(), url.into());
  }

  /// Insert only when `specifier` is not mapped yet. Manifest-derived CDN
  /// entries go through here so internal entries always win.
  pub fn insert_if_absent(&mut self, specifier: impl Into<String>, url: impl Into<String>) {
    self.imports.entry(specifier.into()).or_insert_with(|| url.into());
  }

  /// Map a bare package name plus its `/`-suffixed subpath prefix form.
  pub fn insert_bare_package(&mut self, name: &str, range: &str) {
    let url = cdn_url(name, range);
    self.insert_if_absent(format!("{name}/"), format!("{url}/"));
    self.insert_if_absent(name.to_string(), url);
  }

  pub fn is_empty(&self) -> bool {
    self.imports.is_empty()
  }

  pub fn to_json(&self) -> String {
    serde_json::to_string(self).expect("import map serialization is infallible")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn internal_entries_take_precedence() {
    let mut map = ImportMap::new();
    map.insert("./util.js", "memory://asset/1");
    map.insert_if_absent("./util.js", "https://esm.sh/util@latest");
    assert_eq!(map.imports.get("./util.js").map(String::as_str), Some("memory://asset/1"));
  }

  #[test]
  fn bare_packages_map_name_and_prefix() {
    let mut map = ImportMap::new();
    map.insert_bare_package("react", "^18.2.0");
    assert_eq!(map.imports.get("react").map(String::as_str), Some("https://esm.sh/react@18.2.0"));
    assert_eq!(
      map.imports.get("react/").map(String::as_str),
      Some("https://esm.sh/react@18.2.0/"),
    );
  }
}
