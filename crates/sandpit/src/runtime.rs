/// Module-registry runtime prepended to every generated artifact.
///
/// Deliberately tiny and CommonJS-shaped: each rewritten module becomes a
/// `(module, exports, require)` factory in `__sp_modules`, and circular
/// imports get partial-initialization semantics through the cache. Helper
/// names carry the `__sp_` prefix to stay out of user code's way.
pub const REGISTRY_RUNTIME: &str = r#"const __sp_cache = Object.create(null);
function __sp_require(id) {
  const cached = __sp_cache[id];
  if (cached) return cached.exports;
  const module = { exports: {} };
  __sp_cache[id] = module;
  const factory = __sp_modules[id];
  if (factory) factory(module, module.exports, __sp_require);
  return module.exports;
}
function __sp_interop(ns) {
  return ns && ns.default !== undefined ? ns.default : ns;
}
function __sp_reExport(target, source) {
  for (const key of Object.keys(source)) {
    if (key !== "default" && !(key in target)) target[key] = source[key];
  }
}
function __sp_injectStyle(css) {
  const style = document.createElement("style");
  style.textContent = css;
  document.head.appendChild(style);
}
"#;

/// Open the module-registry object literal.
pub const MODULES_OPEN: &str = "const __sp_modules = {\n";

/// Close the module-registry object literal.
pub const MODULES_CLOSE: &str = "};\n";

pub fn module_entry_open(id: &str) -> String {
  format!("{}: function (module, exports, require) {{\n", serde_json::to_string(id).unwrap_or_default())
}

pub const MODULE_ENTRY_CLOSE: &str = "\n},\n";

pub fn kickoff(entry_id: &str) -> String {
  format!("__sp_require({});\n", serde_json::to_string(entry_id).unwrap_or_default())
}
