use std::cell::RefCell;

use arcstr::ArcStr;
use itertools::Itertools;
use lol_html::{element, end, html_content::ContentType, rewrite_str, RewriteStrSettings};
use rustc_hash::FxHashSet;
use sandpit_common::FileSet;
use sandpit_utils::{
  indexmap::FxIndexMap,
  path_ext::{extension, file_name, normalize_virtual_path},
};

/// Filenames that only mean something to Node-side tooling. A `<script src>`
/// pointing at one of these must never execute in the sandbox.
static NODE_ONLY_FILENAMES: phf::Set<&'static str> = phf::phf_set! {
  "vite.config.js",
  "vite.config.mjs",
  "vite.config.ts",
  "webpack.config.js",
  "webpack.config.cjs",
  "rollup.config.js",
  "rollup.config.mjs",
  "postcss.config.js",
  "postcss.config.cjs",
  "tailwind.config.js",
  "tailwind.config.cjs",
  "tailwind.config.ts",
  "next.config.js",
  "next.config.mjs",
  "babel.config.js",
  "babel.config.cjs",
  "svelte.config.js",
  "astro.config.mjs",
  "astro.config.ts",
  "eslint.config.js",
  "eslint.config.mjs",
};

/// Whether a script reference needs a build step and must not be fetched or
/// executed by the browser as-is.
pub fn requires_build_step(path: &str) -> bool {
  if path.starts_with(".github/workflows/") {
    return true;
  }
  let name = file_name(path);
  if NODE_ONLY_FILENAMES.contains(name) || name.ends_with(".d.ts") {
    return true;
  }
  matches!(extension(path), Some("ts" | "tsx" | "jsx" | "mts" | "cts"))
}

pub struct RewriteInputs<'a> {
  pub files: &'a FileSet,
  /// Logical path to fetchable URL (synthesized handle or external).
  pub asset_urls: &'a FxIndexMap<ArcStr, String>,
  pub import_map_json: &'a str,
  pub console_shim: &'a str,
  /// Import-map specifier of the virtual bundle, when a bundle was produced.
  pub bundle_specifier: Option<&'a str>,
  /// Paths already folded into the bundle artifact.
  pub bundled: &'a FxHashSet<ArcStr>,
}

pub struct DocumentRewrite {
  pub html: String,
  pub warnings: Vec<String>,
}

#[derive(Default)]
struct RewriteState {
  referenced: FxHashSet<String>,
  warnings: Vec<String>,
  injected_into_head: bool,
}

fn is_remote(value: &str) -> bool {
  value.starts_with("http://")
    || value.starts_with("https://")
    || value.starts_with("//")
    || value.starts_with("data:")
    || value.starts_with('#')
}

fn lookup<'a>(inputs: &'a RewriteInputs, attr: &str) -> Option<(String, &'a str)> {
  if is_remote(attr) {
    return None;
  }
  let normalized = normalize_virtual_path(attr);
  let url = inputs.asset_urls.get(normalized.as_str())?;
  Some((normalized, url.as_str()))
}

/// Rewrite the chosen HTML entry document:
///
/// - inject the import map ahead of any module script, with the console shim
///   right behind it;
/// - substitute synthesized handles into stylesheet links, script sources,
///   images and icons;
/// - neutralize scripts that require a build step;
/// - append project CSS/JS files nothing in the document wired up, plus the
///   module script that kicks off the virtual bundle.
pub fn rewrite_document(source: &str, inputs: &RewriteInputs) -> anyhow::Result<DocumentRewrite> {
  let state = RefCell::new(RewriteState::default());
  let injection = format!(
    "<script type=\"importmap\">{}</script>\n<script>{}</script>",
    inputs.import_map_json, inputs.console_shim,
  );

  let rewritten = rewrite_str(
    source,
    RewriteStrSettings {
      element_content_handlers: vec![
        element!("head", |el| {
          el.prepend(&injection, ContentType::Html);
          state.borrow_mut().injected_into_head = true;
          Ok(())
        }),
        element!("link[href]", |el| {
          let rel = el.get_attribute("rel").unwrap_or_default().to_ascii_lowercase();
          let relevant = rel
            .split_whitespace()
            .any(|token| token == "stylesheet" || token == "icon" || token == "apple-touch-icon" || token == "shortcut");
          if !relevant {
            return Ok(());
          }
          if let Some(href) = el.get_attribute("href") {
            if let Some((path, url)) = lookup(inputs, &href) {
              el.set_attribute("href", url)?;
              state.borrow_mut().referenced.insert(path);
            }
          }
          Ok(())
        }),
        element!("script[src]", |el| {
          let Some(src) = el.get_attribute("src") else { return Ok(()) };
          if is_remote(&src) {
            return Ok(());
          }
          let normalized = normalize_virtual_path(&src);
          if requires_build_step(&normalized) {
            // Never let the sandbox fetch something the browser cannot parse
            // as JavaScript.
            el.remove_attribute("src");
            el.set_attribute("type", "text/plain")?;
            let mut state = state.borrow_mut();
            state.warnings.push(format!(
              "\"{normalized}\" requires a build step and was not executed; the bundled output runs in its place",
            ));
            state.referenced.insert(normalized);
            return Ok(());
          }
          if let Some(url) = inputs.asset_urls.get(normalized.as_str()) {
            el.set_attribute("src", url)?;
            state.borrow_mut().referenced.insert(normalized);
          }
          Ok(())
        }),
        element!("img[src]", |el| {
          if let Some(src) = el.get_attribute("src") {
            if let Some((path, url)) = lookup(inputs, &src) {
              el.set_attribute("src", url)?;
              state.borrow_mut().referenced.insert(path);
            }
          }
          Ok(())
        }),
      ],
      document_content_handlers: vec![end!(|document_end| {
        let state = state.borrow();
        let mut tail = String::new();

        let unreferenced = |path: &ArcStr| {
          !state.referenced.contains(path.as_str()) && !inputs.bundled.contains(path)
        };

        // Project files never wired into the document still take effect, the
        // way a casual project expects them to.
        let css = inputs
          .files
          .iter()
          .filter(|(path, content)| {
            extension(path) == Some("css") && unreferenced(path) && content.external_url().is_none()
          })
          .map(|(_, content)| content.text_or_empty().replace("</style", "<\\/style"))
          .filter(|chunk| !chunk.trim().is_empty())
          .join("\n");
        if !css.is_empty() {
          tail.push_str(&format!("<style>\n{css}\n</style>"));
        }

        let js = inputs
          .files
          .iter()
          .filter(|(path, content)| {
            extension(path) == Some("js") && unreferenced(path) && content.external_url().is_none()
          })
          .map(|(_, content)| content.text_or_empty().replace("</script", "<\\/script"))
          .filter(|chunk| !chunk.trim().is_empty())
          .join("\n");
        if !js.is_empty() {
          tail.push_str(&format!("<script>\n{js}\n</script>"));
        }

        if let Some(specifier) = inputs.bundle_specifier {
          tail.push_str(&format!("<script type=\"module\">import \"{specifier}\";</script>"));
        }

        if !tail.is_empty() {
          document_end.append(&tail, ContentType::Html);
        }
        Ok(())
      })],
      ..RewriteStrSettings::default()
    },
  )?;

  let state = state.into_inner();
  let html = if state.injected_into_head {
    rewritten
  } else {
    // No <head> in the source document: fall back to leading the serialized
    // output with the injection block, which still precedes every script.
    format!("{injection}\n{rewritten}")
  };

  Ok(DocumentRewrite { html, warnings: state.warnings })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn asset_urls(entries: &[(&str, &str)]) -> FxIndexMap<ArcStr, String> {
    entries.iter().map(|(path, url)| (ArcStr::from(*path), (*url).to_string())).collect()
  }

  fn inputs<'a>(
    files: &'a FileSet,
    urls: &'a FxIndexMap<ArcStr, String>,
    bundled: &'a FxHashSet<ArcStr>,
  ) -> RewriteInputs<'a> {
    RewriteInputs {
      files,
      asset_urls: urls,
      import_map_json: r#"{"imports":{}}"#,
      console_shim: "/* shim */",
      bundle_specifier: None,
      bundled,
    }
  }

  #[test]
  fn substitutes_known_internal_references() {
    let files: FileSet = [
      ("index.html", "<html><head><link rel=\"stylesheet\" href=\"./app.css\"></head><body><script src=\"main.js\"></script></body></html>"),
      ("app.css", "body{}"),
      ("main.js", "console.log(1)"),
    ]
    .into_iter()
    .collect();
    let urls = asset_urls(&[("app.css", "memory://sandpit/1-a"), ("main.js", "memory://sandpit/2-b"), ("index.html", "memory://sandpit/3-c")]);
    let bundled = FxHashSet::default();

    let out = rewrite_document(files.text("index.html").unwrap(), &inputs(&files, &urls, &bundled)).unwrap();
    assert!(out.html.contains("href=\"memory://sandpit/1-a\""));
    assert!(out.html.contains("src=\"memory://sandpit/2-b\""));
    // Both referenced: no appendix duplicates.
    assert!(!out.html.contains("<style>"));
  }

  #[test]
  fn neutralizes_build_only_scripts() {
    let files: FileSet = [
      ("index.html", "<html><head></head><body><script src=\"./src/main.tsx\"></script></body></html>"),
      ("src/main.tsx", "export {}"),
    ]
    .into_iter()
    .collect();
    let urls = asset_urls(&[("src/main.tsx", "memory://sandpit/1-a")]);
    let bundled = FxHashSet::default();

    let out = rewrite_document(files.text("index.html").unwrap(), &inputs(&files, &urls, &bundled)).unwrap();
    assert!(out.html.contains("type=\"text/plain\""));
    assert!(!out.html.contains("src=\"memory://sandpit/1-a\""));
    assert_eq!(out.warnings.len(), 1);
    assert!(out.warnings[0].contains("src/main.tsx"));
  }

  #[test]
  fn appends_unreferenced_css_and_js() {
    let files: FileSet = [
      ("index.html", "<html><head></head><body><p>hi</p></body></html>"),
      ("theme.css", "p { color: red }"),
      ("extra.js", "console.log('extra')"),
    ]
    .into_iter()
    .collect();
    let urls = asset_urls(&[("theme.css", "u1"), ("extra.js", "u2")]);
    let bundled = FxHashSet::default();

    let out = rewrite_document(files.text("index.html").unwrap(), &inputs(&files, &urls, &bundled)).unwrap();
    assert!(out.html.contains("<style>\np { color: red }\n</style>"));
    assert!(out.html.contains("<script>\nconsole.log('extra')\n</script>"));
  }

  #[test]
  fn injects_into_headless_documents_by_prepending() {
    let files: FileSet = [("index.html", "<h1>Hi</h1>")].into_iter().collect();
    let urls = FxIndexMap::default();
    let bundled = FxHashSet::default();

    let out = rewrite_document("<h1>Hi</h1>", &inputs(&files, &urls, &bundled)).unwrap();
    assert!(out.html.starts_with("<script type=\"importmap\">"));
    assert!(out.html.contains("<h1>Hi</h1>"));
  }

  #[test]
  fn bundle_specifier_is_included_as_a_module_script() {
    let files: FileSet = [("index.html", "<html><head></head><body></body></html>")].into_iter().collect();
    let urls = FxIndexMap::default();
    let bundled = FxHashSet::default();
    let mut rewrite_inputs = inputs(&files, &urls, &bundled);
    rewrite_inputs.bundle_specifier = Some("./__sandpit_bundle__.js");

    let out = rewrite_document(files.text("index.html").unwrap(), &rewrite_inputs).unwrap();
    assert!(out.html.contains("<script type=\"module\">import \"./__sandpit_bundle__.js\";</script>"));
  }

  #[test]
  fn remote_references_pass_through_untouched() {
    let files: FileSet = [("index.html", "")].into_iter().collect();
    let urls = FxIndexMap::default();
    let bundled = FxHashSet::default();

    let html = "<html><head><link rel=\"stylesheet\" href=\"https://cdn.example.com/x.css\"></head><body></body></html>";
    let out = rewrite_document(html, &inputs(&files, &urls, &bundled)).unwrap();
    assert!(out.html.contains("https://cdn.example.com/x.css"));
  }
}
