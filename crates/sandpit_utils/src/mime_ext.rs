use std::str::FromStr;

use mime::Mime;

static MIME_BY_EXTENSION: phf::Map<&'static str, &'static str> = phf::phf_map! {
  "html" => "text/html",
  "htm" => "text/html",
  "css" => "text/css",
  "js" => "text/javascript",
  "mjs" => "text/javascript",
  "cjs" => "text/javascript",
  "json" => "application/json",
  "svg" => "image/svg+xml",
  "png" => "image/png",
  "jpg" => "image/jpeg",
  "jpeg" => "image/jpeg",
  "gif" => "image/gif",
  "webp" => "image/webp",
  "ico" => "image/x-icon",
  "txt" => "text/plain",
  "md" => "text/plain",
  "woff" => "font/woff",
  "woff2" => "font/woff2",
};

/// MIME type for a logical path, by extension.
///
/// TypeScript and JSX extensions are intentionally absent: raw untranspiled
/// source is never served to the sandbox with an executable MIME type.
pub fn mime_for_path(path: &str) -> Mime {
  let mime_str = crate::path_ext::extension(path)
    .map(str::to_ascii_lowercase)
    .and_then(|ext| MIME_BY_EXTENSION.get(ext.as_str()).copied())
    .unwrap_or("application/octet-stream");
  Mime::from_str(mime_str).unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

#[test]
fn test_mime_for_path() {
  assert_eq!(mime_for_path("index.html").essence_str(), "text/html");
  assert_eq!(mime_for_path("src/app.js").essence_str(), "text/javascript");
  assert_eq!(mime_for_path("src/app.tsx").essence_str(), "application/octet-stream");
  assert_eq!(mime_for_path("logo.SVG").essence_str(), "image/svg+xml");
}
