mod bundle_options;
mod log_sink;
mod types;

pub use crate::{
  bundle_options::{
    module_type::{ModuleType, BUNDLEABLE_EXTENSIONS, CODE_EXTENSIONS},
    BundleOptions,
  },
  log_sink::{LogLevel, LogSink, MemorySink, SharedLogSink, TracingSink},
  types::{
    bundle_output::BundleOutput,
    console_bridge::{ConsoleBridgeMessage, ConsoleLogData, CIRCULAR_MARKER, CONSOLE_BRIDGE_TYPE},
    file_set::{FileContent, FileSet},
    import_map::{cdn_url, ImportMap, CDN_HOST},
    lockfile::{LockfileEntry, SynthesizedLockfile},
    package_manager::PackageManager,
    package_manifest::{strip_semver_range, PackageManifest},
    preview_strategy::PreviewStrategy,
    resolved_id::ResolvedId,
    source_joiner::SourceJoiner,
  },
};
