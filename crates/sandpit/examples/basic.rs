use std::sync::Arc;

use sandpit::{BuildOrchestrator, FileSet, TracingSink};
use sandpit_fs::MemoryFileStore;

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
    .init();

  let files: FileSet = [
    ("index.html", "<html><head><title>demo</title></head><body><div id=\"root\"></div></body></html>"),
    ("src/main.tsx", "import { greet } from './greet';\n\ndocument.getElementById('root')!.textContent = greet('sandpit');\n"),
    ("src/greet.ts", "export const greet = (name: string): string => `hello from ${name}`;\n"),
    ("src/theme.css", "body { font-family: sans-serif }"),
  ]
  .into_iter()
  .collect();

  let mut store = MemoryFileStore::new(files);
  let mut orchestrator = BuildOrchestrator::new(Arc::new(TracingSink));

  let outcome = orchestrator.refresh(&mut store, "demo", false).await;
  let html = orchestrator.registry().content(outcome.document.url()).unwrap_or_default();

  tracing::info!(
    strategy = ?outcome.strategy,
    url = %outcome.document.url(),
    bytes = html.len(),
    "preview committed",
  );
}
