use std::sync::{
  atomic::{AtomicU64, Ordering},
  Mutex,
};

use arcstr::ArcStr;
use dashmap::DashMap;
use mime::Mime;
use sandpit_utils::xxhash::xxhash_base64_url;

/// An addressable, revocable reference to in-memory content, usable by the
/// sandboxed viewer as if it were a fetchable resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle {
  id: u64,
  url: ArcStr,
}

impl Handle {
  pub fn url(&self) -> &ArcStr {
    &self.url
  }
}

#[derive(Debug)]
struct StoredResource {
  content: ArcStr,
  mime: Mime,
}

/// Owns every handle of the active preview session and enforces the rotation
/// invariant: the handles of pass N stay alive until pass N+1 fully commits,
/// then are revoked in one sweep. A handle is revocable exactly once.
#[derive(Debug, Default)]
pub struct HandleRegistry {
  resources: DashMap<u64, StoredResource>,
  ids_by_url: DashMap<ArcStr, u64>,
  /// Handles created by the in-flight pass, promoted on commit.
  staged: Mutex<Vec<Handle>>,
  /// Handles of the last committed pass.
  live: Mutex<Vec<Handle>>,
  next_id: AtomicU64,
}

impl HandleRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Materialize content as a fresh handle, staged for the in-flight pass.
  pub fn create(&self, content: impl Into<ArcStr>, mime: Mime) -> Handle {
    let content = content.into();
    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
    let digest = xxhash_base64_url(content.as_bytes());
    let url = arcstr::format!("memory://sandpit/{id}-{}", &digest[..8]);

    self.resources.insert(id, StoredResource { content, mime });
    let handle = Handle { id, url: url.clone() };
    self.ids_by_url.insert(url, id);
    self.staged.lock().expect("registry poisoned").push(handle.clone());
    handle
  }

  /// Release one handle. Returns false when it was already revoked; callers
  /// treat that as a bug signal, not a recoverable state.
  pub fn revoke(&self, handle: &Handle) -> bool {
    self.ids_by_url.remove(handle.url());
    self.resources.remove(&handle.id).is_some()
  }

  pub fn is_alive(&self, handle: &Handle) -> bool {
    self.resources.contains_key(&handle.id)
  }

  /// Fetch content by URL, as the sandboxed viewer would.
  pub fn content(&self, url: &str) -> Option<ArcStr> {
    let id = *self.ids_by_url.get(url)?;
    self.resources.get(&id).map(|resource| resource.content.clone())
  }

  pub fn mime_of(&self, url: &str) -> Option<Mime> {
    let id = *self.ids_by_url.get(url)?;
    self.resources.get(&id).map(|resource| resource.mime.clone())
  }

  /// Promote the staged pass: the previous generation is revoked only now,
  /// after the new one is fully materialized, so the viewer never observes a
  /// transiently invalid reference.
  pub fn commit_pass(&self) {
    let staged = std::mem::take(&mut *self.staged.lock().expect("registry poisoned"));
    let mut live = self.live.lock().expect("registry poisoned");
    for handle in live.drain(..) {
      self.revoke(&handle);
    }
    *live = staged;
  }

  /// Throw away the staged pass after a synthesis failure, leaving the last
  /// committed generation untouched and fully valid.
  pub fn abort_pass(&self) {
    let staged = std::mem::take(&mut *self.staged.lock().expect("registry poisoned"));
    for handle in &staged {
      self.revoke(handle);
    }
  }

  pub fn alive_count(&self) -> usize {
    self.resources.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn create_then_fetch_round_trips() {
    let registry = HandleRegistry::new();
    let handle = registry.create("body { margin: 0 }", mime::TEXT_CSS);
    assert_eq!(registry.content(handle.url()).as_deref(), Some("body { margin: 0 }"));
    assert_eq!(registry.mime_of(handle.url()), Some(mime::TEXT_CSS));
  }

  #[test]
  fn revoke_is_exactly_once() {
    let registry = HandleRegistry::new();
    let handle = registry.create("x", mime::TEXT_PLAIN);
    assert!(registry.revoke(&handle));
    assert!(!registry.revoke(&handle));
    assert_eq!(registry.content(handle.url()), None);
  }

  #[test]
  fn previous_generation_survives_until_commit() {
    let registry = HandleRegistry::new();
    let first = registry.create("<html>1</html>", mime::TEXT_HTML);
    registry.commit_pass();

    let second = registry.create("<html>2</html>", mime::TEXT_HTML);
    // Pass two is staged but not committed: generation one must still serve.
    assert!(registry.is_alive(&first));

    registry.commit_pass();
    assert!(!registry.is_alive(&first));
    assert!(registry.is_alive(&second));
  }

  #[test]
  fn abort_drops_staged_and_keeps_live() {
    let registry = HandleRegistry::new();
    let committed = registry.create("ok", mime::TEXT_HTML);
    registry.commit_pass();

    let staged = registry.create("broken", mime::TEXT_HTML);
    registry.abort_pass();

    assert!(registry.is_alive(&committed));
    assert!(!registry.is_alive(&staged));
    assert_eq!(registry.alive_count(), 1);
  }

  #[test]
  fn identical_content_still_gets_distinct_handles() {
    let registry = HandleRegistry::new();
    let a = registry.create("same", mime::TEXT_PLAIN);
    let b = registry.create("same", mime::TEXT_PLAIN);
    assert_ne!(a.url(), b.url());
  }
}
