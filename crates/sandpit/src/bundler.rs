use arcstr::ArcStr;
use sandpit_common::{
  BundleOptions, BundleOutput, FileSet, ModuleType, SourceJoiner, SynthesizedLockfile,
  BUNDLEABLE_EXTENSIONS,
};
use sandpit_ecmascript::EcmaCompiler;
use sandpit_error::BuildResult;
use sandpit_resolver::Resolver;
use sandpit_utils::path_ext::extension;
use tokio::sync::OnceCell;

use crate::{entry::detect_entry, module_loader::load_graph, runtime};

static TRANSPILER_READY: OnceCell<()> = OnceCell::const_new();

/// One-time transpiler warm-up, shared by every bundle invocation in the
/// session.
///
/// Concurrent callers all await the same in-flight attempt; a failed attempt
/// leaves the cell unset so the next request retries instead of poisoning
/// every future build.
pub async fn ensure_ready() -> BuildResult<()> {
  TRANSPILER_READY
    .get_or_try_init(|| async {
      EcmaCompiler::transpile("__sandpit_probe__.ts", "export const ready: boolean = true;", ModuleType::Ts)
        .map(|_| ())
    })
    .await
    .map(|_| ())
}

/// Transforms the module graph rooted at a chosen entry into one
/// self-contained script artifact.
///
/// Every failure mode is normalized into the returned `BundleOutput`; callers
/// never need to distinguish "thrown" from "returned error list".
#[derive(Default)]
pub struct Bundler {
  resolver: Resolver,
}

impl Bundler {
  pub fn new() -> Self {
    Self { resolver: Resolver::new() }
  }

  pub async fn build(&self, files: &FileSet, options: &BundleOptions) -> BundleOutput {
    let mut output = match self.try_build(files, options).await {
      Ok(output) => output,
      Err(error) => {
        BundleOutput { errors: error.into_messages(), ..BundleOutput::default() }
      }
    };

    if options.sourcemap {
      output
        .warnings
        .push(String::from("source maps are not emitted by the in-memory bundler; the flag is accepted for interface parity"));
    }
    output.lockfile = options.manifest.as_ref().map(SynthesizedLockfile::from_manifest);
    output
  }

  async fn try_build(&self, files: &FileSet, options: &BundleOptions) -> BuildResult<BundleOutput> {
    ensure_ready().await?;

    // Only extensions the bundler understands may enter the candidate set;
    // lockfiles, markdown and friends are not program sources.
    let candidates: FileSet = files
      .iter()
      .filter(|(path, _)| {
        extension(path).is_some_and(|ext| BUNDLEABLE_EXTENSIONS.contains(&ext))
      })
      .map(|(path, content)| (path.clone(), content.clone()))
      .collect();

    let entry = options.entry.as_deref().map(ArcStr::from).or_else(|| detect_entry(&candidates));
    let Some(entry) = entry else {
      return Ok(BundleOutput::from_error("no browser-executable entry found"));
    };

    let graph = load_graph(&candidates, &self.resolver, &entry)?;

    let mut joiner = SourceJoiner::default();
    for (specifier, binding) in &graph.externals {
      joiner.append_source(format!(
        "import * as {binding} from {};",
        serde_json::to_string(specifier.as_str()).unwrap_or_default(),
      ));
    }
    joiner.append_source(runtime::REGISTRY_RUNTIME);
    joiner.append_source(runtime::MODULES_OPEN);
    for node in graph.modules.values() {
      joiner.append_source(runtime::module_entry_open(&node.id));
      joiner.append_source(node.render(&graph.externals));
      joiner.append_source(runtime::MODULE_ENTRY_CLOSE);
    }
    joiner.append_source(runtime::MODULES_CLOSE);
    if let Some(entry_id) = graph.entry_id() {
      joiner.append_source(runtime::kickoff(entry_id));
    }

    let mut code = joiner.join();
    let mut warnings = graph.warnings;

    if options.minify {
      match EcmaCompiler::minify_whitespace("bundle.js", &code) {
        Ok(minified) => code = minified,
        Err(error) => {
          warnings.push(format!(
            "minification failed, emitting the unminified artifact: {}",
            error.into_messages().join("; "),
          ));
        }
      }
    }

    Ok(BundleOutput {
      code,
      warnings,
      errors: Vec::new(),
      lockfile: None,
      included_modules: graph.modules.keys().cloned().collect(),
    })
  }
}
