pub mod console_shim;
pub mod handle;
pub mod html;
pub mod placeholder;

use std::sync::Arc;

use arcstr::ArcStr;
use rustc_hash::FxHashSet;
use sandpit_common::{
  BundleOutput, FileSet, ImportMap, PackageManager, PackageManifest, SharedLogSink,
};
use sandpit_error::BuildResult;
use sandpit_utils::{indexmap::FxIndexMap, mime_ext::mime_for_path, path_ext::extension};

use crate::preview::{
  console_shim::CONSOLE_SHIM,
  handle::{Handle, HandleRegistry},
  html::{rewrite_document, RewriteInputs},
};

/// Fixed virtual filename the bundle artifact is served under. The rewritten
/// document imports this specifier; the import map resolves it to the
/// artifact's handle.
pub const VIRTUAL_BUNDLE_PATH: &str = "__sandpit_bundle__.js";

/// Synthesizes one self-contained, loadable HTML document per pass, with
/// every internal reference resolved to something fetchable from inside the
/// sandbox.
pub struct PreviewSynthesizer {
  registry: Arc<HandleRegistry>,
  log: SharedLogSink,
}

impl PreviewSynthesizer {
  pub fn new(registry: Arc<HandleRegistry>, log: SharedLogSink) -> Self {
    Self { registry, log }
  }

  /// Run a full synthesis pass and commit its document handle.
  ///
  /// Never leaves the registry in a half-rotated state: a failure drops the
  /// staged pass, keeps the previous document serving, and commits a fresh
  /// error-report pass instead.
  pub fn synthesize(&self, files: &FileSet, artifact: Option<&BundleOutput>) -> Handle {
    match self.try_synthesize(files, artifact) {
      Ok(document) => document,
      Err(error) => {
        self.registry.abort_pass();
        let messages = error.into_messages();
        for message in &messages {
          self.log.error(&format!("preview synthesis failed: {message}"));
        }
        self.commit_document(placeholder::error_report_document(&messages))
      }
    }
  }

  /// Commit a dedicated error-report document for a failed bundle.
  pub fn commit_error_report(&self, errors: &[String]) -> Handle {
    self.commit_document(placeholder::error_report_document(errors))
  }

  /// Commit the "this needs a real dev server" guidance document.
  pub fn commit_guidance(&self, manager: PackageManager) -> Handle {
    self.commit_document(placeholder::dev_server_document(manager))
  }

  fn commit_document(&self, html: String) -> Handle {
    let document = self.registry.create(html, mime::TEXT_HTML);
    self.registry.commit_pass();
    document
  }

  fn try_synthesize(&self, files: &FileSet, artifact: Option<&BundleOutput>) -> BuildResult<Handle> {
    let mut asset_urls: FxIndexMap<ArcStr, String> = FxIndexMap::default();
    let mut import_map = ImportMap::new();

    // Every file becomes addressable: external URLs pass through untouched
    // (nothing local to revoke later), anything else gets a handle. Only
    // pure-JavaScript files also enter the import map by specifier.
    for (path, content) in files.iter() {
      let url = match content.external_url() {
        Some(external) => external.to_string(),
        None => {
          let handle = self.registry.create(content.text_or_empty(), mime_for_path(path));
          handle.url().to_string()
        }
      };
      if matches!(extension(path), Some("js" | "mjs" | "cjs")) {
        import_map.insert(format!("./{path}"), url.clone());
      }
      asset_urls.insert(path.clone(), url);
    }

    let mut bundle_specifier = None;
    let mut bundled: FxHashSet<ArcStr> = FxHashSet::default();
    if let Some(artifact) = artifact {
      if !artifact.code.is_empty() {
        let handle = self.registry.create(artifact.code.as_str(), mime::TEXT_JAVASCRIPT);
        let specifier = format!("./{VIRTUAL_BUNDLE_PATH}");
        import_map.insert(specifier.clone(), handle.url().to_string());
        bundle_specifier = Some(specifier);
        bundled = artifact.included_modules.iter().cloned().collect();
      }
    }

    // Manifest-declared dependencies map to CDN URLs, but never shadow an
    // internal entry.
    if let Some(manifest_source) = files.text("package.json") {
      let manifest = PackageManifest::from_json_lenient(manifest_source);
      for (name, range, _) in manifest.all_dependencies() {
        import_map.insert_bare_package(name, range);
      }
    }

    let fallback;
    let html_source = match files.html_entry() {
      Some(path) => {
        let source = files.get(path).map(sandpit_common::FileContent::text_or_empty);
        source.unwrap_or_default()
      }
      None => {
        self.log.info("no HTML entry document found; rendering a placeholder");
        fallback = placeholder::missing_entry_document();
        fallback.as_str()
      }
    };

    let rewrite = rewrite_document(
      html_source,
      &RewriteInputs {
        files,
        asset_urls: &asset_urls,
        import_map_json: &import_map.to_json(),
        console_shim: CONSOLE_SHIM,
        bundle_specifier: bundle_specifier.as_deref(),
        bundled: &bundled,
      },
    )
    .map_err(|error| anyhow::anyhow!("{error:#}"))?;

    for warning in &rewrite.warnings {
      self.log.warn(warning);
    }

    let document = self.registry.create(rewrite.html, mime::TEXT_HTML);
    self.registry.commit_pass();
    Ok(document)
  }
}

#[cfg(test)]
mod tests {
  use sandpit_common::MemorySink;

  use super::*;

  fn synthesizer() -> (Arc<HandleRegistry>, Arc<MemorySink>, PreviewSynthesizer) {
    let registry = Arc::new(HandleRegistry::new());
    let sink = Arc::new(MemorySink::default());
    let log: SharedLogSink = sink.clone();
    let synthesizer = PreviewSynthesizer::new(Arc::clone(&registry), log);
    (registry, sink, synthesizer)
  }

  #[test]
  fn static_round_trip_preserves_visible_content() {
    let (registry, _, synthesizer) = synthesizer();
    let files: FileSet =
      [("index.html", "<html><body><h1>Hi</h1></body></html>")].into_iter().collect();

    let document = synthesizer.synthesize(&files, None);
    let html = registry.content(document.url()).unwrap();
    assert!(html.contains("<h1>Hi</h1>"));
    assert!(html.contains("importmap"));
    assert!(html.contains("console-log"));
  }

  #[test]
  fn bundle_artifact_rides_in_as_the_virtual_module() {
    let (registry, _, synthesizer) = synthesizer();
    let files: FileSet = [
      ("index.html", "<html><head></head><body></body></html>"),
      ("src/main.tsx", "console.log('hi')"),
    ]
    .into_iter()
    .collect();
    let artifact = BundleOutput {
      code: String::from("console.log('bundled');"),
      included_modules: vec![ArcStr::from("src/main.tsx")],
      ..BundleOutput::default()
    };

    let document = synthesizer.synthesize(&files, Some(&artifact));
    let html = registry.content(document.url()).unwrap();
    assert!(html.contains("import \"./__sandpit_bundle__.js\";"));
    assert!(html.contains("__sandpit_bundle__.js\":\"memory://sandpit/"));
    assert!(!html.contains("src=\"src/main.tsx\""));
  }

  #[test]
  fn manifest_dependencies_join_the_import_map_without_shadowing() {
    let (registry, _, synthesizer) = synthesizer();
    let files: FileSet = [
      ("index.html", "<html><head></head><body></body></html>"),
      ("react.js", "// local shadow"),
      ("package.json", r#"{"dependencies":{"react":"^18.2.0","left-pad":"1.3.0"}}"#),
    ]
    .into_iter()
    .collect();

    let document = synthesizer.synthesize(&files, None);
    let html = registry.content(document.url()).unwrap();
    assert!(html.contains("\"left-pad\":\"https://esm.sh/left-pad@1.3.0\""));
    assert!(html.contains("\"left-pad/\":\"https://esm.sh/left-pad@1.3.0/\""));
    // The local ./react.js mapping exists alongside the bare CDN entry.
    assert!(html.contains("\"./react.js\":\"memory://sandpit/"));
    assert!(html.contains("\"react\":\"https://esm.sh/react@18.2.0\""));
  }

  #[test]
  fn missing_html_entry_renders_a_placeholder() {
    let (registry, sink, synthesizer) = synthesizer();
    let files: FileSet = [("notes.txt", "plain")].into_iter().collect();

    let document = synthesizer.synthesize(&files, None);
    let html = registry.content(document.url()).unwrap();
    assert!(html.contains("No HTML entry point"));
    assert!(sink.contains("no HTML entry document found"));
  }

  #[test]
  fn consecutive_passes_rotate_handle_generations() {
    let (registry, _, synthesizer) = synthesizer();
    let files: FileSet =
      [("index.html", "<html><body><p>v</p></body></html>"), ("app.css", "p{}")].into_iter().collect();

    let first = synthesizer.synthesize(&files, None);
    let first_alive = registry.alive_count();
    let second = synthesizer.synthesize(&files, None);

    assert!(registry.content(first.url()).is_none(), "pass N handles must be gone by pass N+1 commit");
    assert!(registry.content(second.url()).is_some());
    assert_eq!(registry.alive_count(), first_alive);
  }
}
