use sandpit_utils::indexmap::FxIndexMap;
use serde::{Deserialize, Serialize};

/// `package.json`-shaped dependency manifest.
///
/// Only the fields the pipeline consumes are modeled; unknown fields are
/// ignored on parse and dropped on serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageManifest {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  #[serde(skip_serializing_if = "FxIndexMap::is_empty")]
  pub dependencies: FxIndexMap<String, String>,
  #[serde(rename = "devDependencies", skip_serializing_if = "FxIndexMap::is_empty")]
  pub dev_dependencies: FxIndexMap<String, String>,
}

impl PackageManifest {
  pub fn from_json(source: &str) -> anyhow::Result<Self> {
    serde_json::from_str(source).map_err(Into::into)
  }

  /// Lenient variant for user-authored manifests: malformed JSON degrades to
  /// an empty manifest instead of failing the preview.
  pub fn from_json_lenient(source: &str) -> Self {
    Self::from_json(source).unwrap_or_default()
  }

  pub fn display_name(&self) -> &str {
    self.name.as_deref().unwrap_or("web-project")
  }

  pub fn display_version(&self) -> &str {
    self.version.as_deref().unwrap_or("1.0.0")
  }

  pub fn is_empty(&self) -> bool {
    self.dependencies.is_empty() && self.dev_dependencies.is_empty()
  }

  /// Prod dependencies first, then dev, both in manifest order.
  pub fn all_dependencies(&self) -> impl Iterator<Item = (&str, &str, bool)> {
    let prod = self.dependencies.iter().map(|(name, range)| (name.as_str(), range.as_str(), false));
    let dev =
      self.dev_dependencies.iter().map(|(name, range)| (name.as_str(), range.as_str(), true));
    prod.chain(dev)
  }
}

/// Strip common semver range operators so `^18.2.0` maps to a concrete
/// `18.2.0` CDN path segment. `*` and empty ranges degrade to `latest`.
pub fn strip_semver_range(range: &str) -> &str {
  let stripped = range.trim().trim_start_matches(['^', '~', '=', 'v', '>', '<']).trim();
  if stripped.is_empty() || stripped == "*" {
    "latest"
  } else {
    stripped
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_the_fields_it_needs() {
    let manifest = PackageManifest::from_json(
      r#"{
        "name": "demo",
        "version": "0.1.0",
        "scripts": { "dev": "vite" },
        "dependencies": { "react": "^18.2.0" },
        "devDependencies": { "typescript": "~5.4.0" }
      }"#,
    )
    .unwrap();

    assert_eq!(manifest.display_name(), "demo");
    assert_eq!(manifest.dependencies.get("react").map(String::as_str), Some("^18.2.0"));
    assert_eq!(
      manifest.all_dependencies().collect::<Vec<_>>(),
      vec![("react", "^18.2.0", false), ("typescript", "~5.4.0", true)],
    );
  }

  #[test]
  fn malformed_manifest_degrades_to_empty() {
    assert!(PackageManifest::from_json_lenient("{ not json").is_empty());
  }

  #[test]
  fn semver_range_stripping() {
    assert_eq!(strip_semver_range("^18.2.0"), "18.2.0");
    assert_eq!(strip_semver_range("~5.4.0"), "5.4.0");
    assert_eq!(strip_semver_range(">=2.0.0"), "2.0.0");
    assert_eq!(strip_semver_range("*"), "latest");
    assert_eq!(strip_semver_range(""), "latest");
  }
}
