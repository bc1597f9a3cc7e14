mod bundler;
mod entry;
mod module_loader;
mod orchestrator;
mod preview;
mod runtime;

pub use crate::{
  bundler::{ensure_ready, Bundler},
  entry::{detect_entry, ENTRY_CANDIDATES},
  orchestrator::{classify, BuildOrchestrator, PreviewOutcome},
  preview::{
    console_shim::CONSOLE_SHIM,
    handle::{Handle, HandleRegistry},
    PreviewSynthesizer, VIRTUAL_BUNDLE_PATH,
  },
};
pub use sandpit_common::*;
