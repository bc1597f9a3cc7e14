use itertools::Itertools;
use sandpit_common::PackageManager;

fn escape_html(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for ch in text.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(ch),
    }
  }
  out
}

const PAGE_STYLE: &str = "body{font-family:ui-monospace,SFMono-Regular,Menlo,monospace;background:#1c1f26;color:#e6e6e6;margin:0;padding:2.5rem}h1{font-size:1.1rem;margin:0 0 1rem}p{color:#9aa4b2;max-width:60ch}pre{background:#12141a;border-left:3px solid #e5484d;padding:1rem;overflow:auto;white-space:pre-wrap}code{background:#12141a;padding:.15rem .4rem;border-radius:4px}";

fn page(title: &str, body: &str) -> String {
  format!(
    "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{PAGE_STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
    escape_html(title),
  )
}

/// Step-2 fallback when the file set carries no HTML document at all.
pub fn missing_entry_document() -> String {
  page(
    "No HTML entry",
    "<h1>No HTML entry point</h1>\n<p>This project has no <code>index.html</code> (or any other HTML file), so there is nothing to render directly. Add an <code>index.html</code>, or keep editing &mdash; script output still appears in the console below.</p>",
  )
}

/// Dedicated report shown instead of the project when bundling failed. The
/// raw error strings are embedded verbatim (escaped), since the console is
/// the only debugging surface available.
pub fn error_report_document(errors: &[String]) -> String {
  let rendered = errors.iter().map(|error| escape_html(error)).join("\n");
  page(
    "Build failed",
    &format!(
      "<h1>Build failed</h1>\n<p>The in-memory bundler could not produce a runnable script. Fix the first error and save to retry.</p>\n<pre>{rendered}</pre>",
    ),
  )
}

/// Guidance shown when the project structurally requires a real package
/// manager and dev server, naming the detected tool and the two commands to
/// run locally.
pub fn dev_server_document(manager: PackageManager) -> String {
  page(
    "This project needs a dev server",
    &format!(
      "<h1>This project needs a real dev server</h1>\n<p>A dependency lockfile or bundler configuration was detected &mdash; this project is meant to be installed and served locally with <code>{name}</code>, not executed raw in the preview sandbox.</p>\n<p>Run these locally:</p>\n<pre>{install}\n{dev}</pre>\n<p>You can still use a static preview from the project settings if you only need the markup.</p>",
      name = manager.name(),
      install = manager.install_command(),
      dev = manager.dev_command(),
    ),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn error_report_embeds_escaped_errors() {
    let html = error_report_document(&[String::from("src/a.ts:1:7: unexpected token `<`")]);
    assert!(html.contains("unexpected token"));
    assert!(html.contains("&lt;"));
    assert!(!html.contains("token `<`"));
  }

  #[test]
  fn guidance_names_the_package_manager_and_commands() {
    let html = dev_server_document(PackageManager::Bun);
    assert!(html.contains("bun"));
    assert!(html.contains("bun install"));
    assert!(html.contains("bun dev"));
  }
}
