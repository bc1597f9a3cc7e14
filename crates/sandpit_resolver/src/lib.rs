// Specifier resolution and module loading against an in-memory file set.
// There is no real filesystem or network here: bare package specifiers are
// classified external and left for the preview import map to satisfy.

mod loader;
mod resolver;

pub use crate::{
  loader::{load_module, LoadedModule},
  resolver::Resolver,
};
