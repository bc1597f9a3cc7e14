use arcstr::ArcStr;
use sandpit_utils::{
  indexmap::FxIndexMap,
  path_ext::{extension, normalize_virtual_path},
  xxhash::xxhash_u128,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Content of one logical project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
  /// Source code, markup or config held in memory.
  Text(ArcStr),
  /// Absolute URL of a binary/media asset fetched or generated elsewhere.
  ExternalUrl(String),
  /// Content intentionally omitted, e.g. it exceeded the per-file size limit.
  Omitted,
}

impl FileContent {
  pub fn text(value: impl AsRef<str>) -> Self {
    Self::Text(ArcStr::from(value.as_ref()))
  }

  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(text) => Some(text),
      Self::ExternalUrl(_) | Self::Omitted => None,
    }
  }

  /// Text form with the omitted sentinel degraded to an empty string.
  pub fn text_or_empty(&self) -> &str {
    match self {
      Self::Text(text) => text,
      Self::ExternalUrl(url) => url,
      Self::Omitted => "",
    }
  }

  /// The externally fetchable URL for this content, if any. Text payloads
  /// that hold a bare absolute URL count; nothing local is allocated for
  /// them at synthesis time.
  pub fn external_url(&self) -> Option<&str> {
    match self {
      Self::ExternalUrl(url) => Some(url),
      Self::Text(text) => {
        let trimmed = text.trim();
        (looks_like_external_url(trimmed) && !trimmed.contains(char::is_whitespace))
          .then_some(trimmed)
      }
      Self::Omitted => None,
    }
  }
}

pub fn looks_like_external_url(value: &str) -> bool {
  value.starts_with("http://") || value.starts_with("https://") || value.starts_with("data:")
}

impl Serialize for FileContent {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Self::Text(text) => serializer.serialize_str(text),
      Self::ExternalUrl(url) => serializer.serialize_str(url),
      Self::Omitted => serializer.serialize_none(),
    }
  }
}

impl<'de> Deserialize<'de> for FileContent {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(match value {
      None => Self::Omitted,
      Some(text) if looks_like_external_url(text.trim()) => Self::ExternalUrl(text),
      Some(text) => Self::Text(ArcStr::from(text)),
    })
  }
}

/// The project file set: logical path to content.
///
/// Keys are unique, forward-slash separated and project-root-relative; they
/// never begin with `/`. Insertion order is preserved, which keeps every
/// downstream artifact (import maps, lockfiles, appended assets)
/// deterministic for a given set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
  files: FxIndexMap<ArcStr, FileContent>,
}

impl FileSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert under the normalized form of `path`. Returns the previous content
  /// when the normalized key already existed.
  pub fn insert(&mut self, path: impl AsRef<str>, content: FileContent) -> Option<FileContent> {
    let normalized = normalize_virtual_path(path.as_ref());
    if normalized.is_empty() {
      return None;
    }
    self.files.insert(ArcStr::from(normalized), content)
  }

  pub fn insert_text(&mut self, path: impl AsRef<str>, text: impl AsRef<str>) {
    self.insert(path, FileContent::text(text));
  }

  pub fn get(&self, path: &str) -> Option<&FileContent> {
    self.files.get(normalize_virtual_path(path).as_str())
  }

  pub fn text(&self, path: &str) -> Option<&str> {
    self.get(path).and_then(FileContent::as_text)
  }

  pub fn contains(&self, path: &str) -> bool {
    self.get(path).is_some()
  }

  pub fn remove(&mut self, path: &str) -> Option<FileContent> {
    self.files.shift_remove(normalize_virtual_path(path).as_str())
  }

  pub fn len(&self) -> usize {
    self.files.len()
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }

  pub fn paths(&self) -> impl Iterator<Item = &ArcStr> {
    self.files.keys()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&ArcStr, &FileContent)> {
    self.files.iter()
  }

  pub fn first_path(&self) -> Option<&ArcStr> {
    self.files.keys().next()
  }

  /// First path carrying one of `extensions`, in insertion order.
  pub fn first_with_extension(&self, extensions: &[&str]) -> Option<&ArcStr> {
    self
      .files
      .keys()
      .find(|path| extension(path).is_some_and(|ext| extensions.contains(&ext)))
  }

  pub fn any_with_extension(&self, extensions: &[&str]) -> bool {
    self.first_with_extension(extensions).is_some()
  }

  /// The HTML entry document: a root `index.html` wins, else the first
  /// `.html`/`.htm` file present.
  pub fn html_entry(&self) -> Option<&ArcStr> {
    if let Some((path, _)) = self.files.get_key_value("index.html") {
      return Some(path);
    }
    self.first_with_extension(&["html", "htm"])
  }

  /// Whether a compiled `.js` sibling exists for a transpilation-required
  /// source, e.g. `src/main.tsx` next to `src/main.js`.
  pub fn has_compiled_js_sibling(&self, path: &str) -> bool {
    let Some(ext) = extension(path) else { return false };
    let stem = &path[..path.len() - ext.len() - 1];
    self.contains(&format!("{stem}.js"))
  }

  /// Order-sensitive content fingerprint for the bundle cache.
  pub fn fingerprint(&self) -> u128 {
    let mut snapshot = Vec::with_capacity(self.files.len() * 24);
    for (path, content) in &self.files {
      snapshot.extend_from_slice(path.as_bytes());
      snapshot.push(0);
      let payload = content.text_or_empty();
      snapshot.extend_from_slice(&(payload.len() as u64).to_le_bytes());
      snapshot.extend_from_slice(&xxhash_u128(payload.as_bytes()).to_le_bytes());
    }
    xxhash_u128(&snapshot)
  }
}

impl<P: AsRef<str>, C: Into<FileContent>> FromIterator<(P, C)> for FileSet {
  fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
    let mut set = Self::new();
    for (path, content) in iter {
      set.insert(path, content.into());
    }
    set
  }
}

impl From<&str> for FileContent {
  fn from(value: &str) -> Self {
    Self::text(value)
  }
}

impl From<String> for FileContent {
  fn from(value: String) -> Self {
    Self::Text(ArcStr::from(value))
  }
}

impl Serialize for FileSet {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.files.serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for FileSet {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = FxIndexMap::<String, FileContent>::deserialize(deserializer)?;
    Ok(raw.into_iter().collect())
  }
}

impl<P: AsRef<str>, C: Into<FileContent>> Extend<(P, C)> for FileSet {
  fn extend<I: IntoIterator<Item = (P, C)>>(&mut self, iter: I) {
    for (path, content) in iter {
      self.insert(path, content.into());
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keys_are_normalized() {
    let mut set = FileSet::new();
    set.insert_text("./src/./main.ts", "let a = 1;");
    assert!(set.contains("src/main.ts"));
    assert_eq!(set.text("./src/main.ts"), Some("let a = 1;"));
  }

  #[test]
  fn html_entry_prefers_root_index() {
    let set: FileSet =
      [("docs/about.html", "<p>about</p>"), ("index.html", "<h1>Hi</h1>")].into_iter().collect();
    assert_eq!(set.html_entry().map(ArcStr::as_str), Some("index.html"));

    let set: FileSet = [("docs/about.html", "<p>about</p>")].into_iter().collect();
    assert_eq!(set.html_entry().map(ArcStr::as_str), Some("docs/about.html"));
  }

  #[test]
  fn external_url_detection() {
    let content = FileContent::text("https://cdn.example.com/cat.png");
    assert_eq!(content.external_url(), Some("https://cdn.example.com/cat.png"));
    assert_eq!(FileContent::text("body { color: red }").external_url(), None);
    assert_eq!(FileContent::Omitted.external_url(), None);
  }

  #[test]
  fn fingerprint_tracks_content() {
    let a: FileSet = [("a.js", "1")].into_iter().collect();
    let b: FileSet = [("a.js", "1")].into_iter().collect();
    let c: FileSet = [("a.js", "2")].into_iter().collect();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
  }

  #[test]
  fn omitted_content_round_trips_as_null() {
    let json = r#"{"a.png": null, "b.txt": "hi", "c.png": "https://x.test/c.png"}"#;
    let set: FileSet = serde_json::from_str(json).unwrap();
    assert_eq!(set.get("a.png"), Some(&FileContent::Omitted));
    assert_eq!(set.get("b.txt"), Some(&FileContent::text("hi")));
    assert!(matches!(set.get("c.png"), Some(FileContent::ExternalUrl(_))));
  }
}
