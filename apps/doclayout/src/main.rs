use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use doclayout::config::Config;
use doclayout::export::{ExportSource, Exporter, JsonPageEncoder};
use doclayout::models::document::LayoutRequest;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the encoded document.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: doclayout-preview <request.json>");
    };

    info!("doclayout-preview v{}", env!("CARGO_PKG_VERSION"));
    let source = read_source(Path::new(&path))?;

    let exporter = Exporter::new(
        Arc::new(config.layout),
        Arc::new(JsonPageEncoder { pretty: true }),
        config.layout_timeout,
    );
    let artifact = exporter.export(source, None).await?;

    for diagnostic in &artifact.diagnostics {
        warn!(severity = ?diagnostic.severity(), "{diagnostic:?}");
    }
    info!(
        filename = %artifact.filename,
        pages = artifact.page_count,
        "Preview rendered"
    );

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&artifact.bytes)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

/// Reads either a tagged `ExportSource` or a bare `LayoutRequest`.
/// A bare request is treated as a generated report.
fn read_source(path: &Path) -> Result<ExportSource> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    if value.get("kind").is_some() {
        return serde_json::from_value(value).context("Invalid export source");
    }

    let request: LayoutRequest = serde_json::from_value(value).context("Invalid layout request")?;
    Ok(ExportSource::GeneratedReport {
        title: request.title,
        body: request.body,
        table: request.table,
        page_geometry: request.page_geometry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_bare_layout_request() {
        let file = write_temp(r#"{"title": "Notes", "body": "Hello"}"#);
        let source = read_source(file.path()).unwrap();
        match source {
            ExportSource::GeneratedReport { title, body, .. } => {
                assert_eq!(title, "Notes");
                assert_eq!(body, "Hello");
            }
            other => panic!("unexpected source: {other:?}"),
        }
    }

    #[test]
    fn test_reads_tagged_transcript() {
        let file = write_temp(
            r#"{"kind": "chat_transcript", "title": "Chat",
                "messages": [{"role": "user", "content": "hi"}]}"#,
        );
        let source = read_source(file.path()).unwrap();
        assert!(matches!(source, ExportSource::ChatTranscript { .. }));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let file = write_temp("not json");
        let err = read_source(file.path()).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_source(Path::new("/nonexistent/request.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/request.json"));
    }
}
