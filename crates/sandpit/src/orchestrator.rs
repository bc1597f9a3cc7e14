use std::sync::Arc;

use sandpit_common::{
  BundleOptions, BundleOutput, FileContent, FileSet, PackageManager, PackageManifest,
  PreviewStrategy, SharedLogSink,
};
use sandpit_fs::FileStore;
use sandpit_utils::{
  indexmap::FxIndexMap,
  path_ext::{extension, file_name},
};

use crate::{
  bundler::Bundler,
  preview::{handle::Handle, handle::HandleRegistry, PreviewSynthesizer},
};

/// Most-recent successful bundles kept per session, oldest evicted first.
const MAX_CACHED_BUNDLES: usize = 8;

const DEFAULT_MANIFEST: &str = "{\n  \"name\": \"web-project\",\n  \"version\": \"1.0.0\",\n  \"dependencies\": {}\n}\n";

const DEFAULT_TSCONFIG: &str = "{\n  \"compilerOptions\": {\n    \"target\": \"ESNext\",\n    \"module\": \"ESNext\",\n    \"jsx\": \"react\",\n    \"strict\": false,\n    \"allowJs\": true\n  }\n}\n";

fn is_bundler_config(path: &str) -> bool {
  let name = file_name(path);
  ["vite.config.", "webpack.config.", "rollup.config.", "esbuild.config.", "parcel.config."]
    .iter()
    .any(|prefix| name.starts_with(prefix))
}

fn needs_bundling(files: &FileSet) -> bool {
  files.paths().any(|path| {
    matches!(extension(path), Some("ts" | "tsx" | "jsx" | "mts" | "cts"))
      && !path.ends_with(".d.ts")
      && !files.has_compiled_js_sibling(path)
  })
}

/// Decide the preview strategy for a file-set snapshot.
///
/// Pure and deterministic. The refusal heuristic is deliberately tunable via
/// `static_preview_override`: a stray config file can misclassify a project,
/// and the override lets the user force a static render anyway.
pub fn classify(files: &FileSet, static_preview_override: bool) -> PreviewStrategy {
  if !static_preview_override {
    let manager = PackageManager::detect(files);
    let locked_manifest = manager.is_some() && files.contains("package.json");
    let bundler_config = files.paths().any(|path| is_bundler_config(path));
    if locked_manifest || bundler_config {
      return PreviewStrategy::Refused {
        package_manager: manager.unwrap_or(PackageManager::Npm),
      };
    }
  }

  if needs_bundling(files) {
    PreviewStrategy::Bundling
  } else {
    PreviewStrategy::StaticRender
  }
}

/// Everything one refresh produced: the strategy taken, the committed
/// document handle, and (when a bundle ran) its diagnostics.
#[derive(Debug)]
pub struct PreviewOutcome {
  pub strategy: PreviewStrategy,
  pub document: Handle,
  pub bundle: Option<Arc<BundleOutput>>,
}

struct CachedBundle {
  fingerprint: u128,
  artifact: Arc<BundleOutput>,
}

/// The single decision point invoked on every meaningful file-set mutation.
pub struct BuildOrchestrator {
  bundler: Bundler,
  registry: Arc<HandleRegistry>,
  synthesizer: PreviewSynthesizer,
  log: SharedLogSink,
  cache: FxIndexMap<String, CachedBundle>,
}

impl BuildOrchestrator {
  pub fn new(log: SharedLogSink) -> Self {
    let registry = Arc::new(HandleRegistry::new());
    let synthesizer = PreviewSynthesizer::new(Arc::clone(&registry), Arc::clone(&log));
    Self { bundler: Bundler::new(), registry, synthesizer, log, cache: FxIndexMap::default() }
  }

  /// The registry serving this session's handles; the sandboxed viewer (and
  /// tests) fetch document content through it.
  pub fn registry(&self) -> &Arc<HandleRegistry> {
    &self.registry
  }

  /// Run one full refresh pass against the store's current state.
  ///
  /// Never throws into the host: every failure path commits a document
  /// (error report or guidance) and reports through the log sink.
  pub async fn refresh(
    &mut self,
    store: &mut dyn FileStore,
    project_id: &str,
    static_preview_override: bool,
  ) -> PreviewOutcome {
    let snapshot = store.snapshot();
    let strategy = classify(&snapshot, static_preview_override);

    match strategy {
      PreviewStrategy::Refused { package_manager } => {
        self.log.warn(&format!(
          "project structurally requires {}; presenting dev-server guidance instead of executing it",
          package_manager.name(),
        ));
        let document = self.synthesizer.commit_guidance(package_manager);
        PreviewOutcome { strategy, document, bundle: None }
      }
      PreviewStrategy::StaticRender => {
        let document = self.synthesizer.synthesize(&snapshot, None);
        self.log.success("static preview refreshed");
        PreviewOutcome { strategy, document, bundle: None }
      }
      PreviewStrategy::Bundling => {
        let snapshot = self.ensure_bundling_defaults(store, snapshot);
        let artifact = self.bundle_with_cache(project_id, &snapshot).await;

        for warning in &artifact.warnings {
          self.log.warn(warning);
        }

        if artifact.is_success() {
          let document = self.synthesizer.synthesize(&snapshot, Some(&*artifact));
          self.log.success("bundled preview refreshed");
          PreviewOutcome { strategy, document, bundle: Some(artifact) }
        } else {
          for error in &artifact.errors {
            self.log.error(error);
          }
          let document = self.synthesizer.commit_error_report(&artifact.errors);
          PreviewOutcome { strategy, document, bundle: Some(artifact) }
        }
      }
    }
  }

  /// The bundler needs a manifest and TS config to target consistently;
  /// synthesize minimal defaults when the project has none. This is the one
  /// sanctioned file-set mutation, and it is always logged.
  fn ensure_bundling_defaults(&self, store: &mut dyn FileStore, snapshot: FileSet) -> FileSet {
    let mut snapshot = snapshot;

    if !snapshot.contains("package.json") {
      store.write("package.json", FileContent::text(DEFAULT_MANIFEST));
      snapshot.insert_text("package.json", DEFAULT_MANIFEST);
      self.log.info("no package.json present; synthesized a minimal default manifest");
    }

    let has_typescript =
      snapshot.paths().any(|path| matches!(extension(path), Some("ts" | "tsx" | "mts" | "cts")));
    if has_typescript && !snapshot.contains("tsconfig.json") {
      store.write("tsconfig.json", FileContent::text(DEFAULT_TSCONFIG));
      snapshot.insert_text("tsconfig.json", DEFAULT_TSCONFIG);
      self.log.info("no tsconfig.json present; synthesized permissive compiler defaults");
    }

    snapshot
  }

  async fn bundle_with_cache(&mut self, project_id: &str, snapshot: &FileSet) -> Arc<BundleOutput> {
    let fingerprint = snapshot.fingerprint();

    if let Some(cached) = self.cache.get(project_id) {
      if cached.fingerprint == fingerprint {
        self.log.debug("bundle cache hit; skipping rebuild");
        return Arc::clone(&cached.artifact);
      }
    }

    let manifest = snapshot.text("package.json").map(PackageManifest::from_json_lenient);
    let options = BundleOptions { manifest, ..BundleOptions::default() };
    let artifact = Arc::new(self.bundler.build(snapshot, &options).await);

    if artifact.is_success() {
      self.cache.shift_remove(project_id);
      self
        .cache
        .insert(project_id.to_string(), CachedBundle { fingerprint, artifact: Arc::clone(&artifact) });
      while self.cache.len() > MAX_CACHED_BUNDLES {
        self.cache.shift_remove_index(0);
      }
    }

    artifact
  }
}
