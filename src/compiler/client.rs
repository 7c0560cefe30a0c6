//! Client-side compilation with `less.js`
//!
//! Nothing is compiled here. The client strategy only exposes which sources
//! the page has to load, plus the `less.js` options derived from the shared
//! compilation options.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::{ClientOptions, CompilationOptions, FileMapping, Mode};
use crate::error::BuildResult;

use super::{CompileOutcome, CompilerStrategy, FileReport, RunReport, SkipReason};

/// One stylesheet for the browser runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientStylesheet {
    /// Source url the page links with `rel="stylesheet/less"`
    pub href: String,
    /// Where server mode would have written the compiled output
    pub destination: String,
}

/// `less = {...}` options understood by `less.js`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessJsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rootpath: Option<String>,
    #[serde(rename = "relativeUrls")]
    pub relative_urls: bool,
}

/// Everything a page needs to compile the configured files in the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientManifest {
    pub script_url: String,
    pub options: LessJsOptions,
    pub stylesheets: Vec<ClientStylesheet>,
}

impl ClientManifest {
    /// HTML for the document head: stylesheet links, options, then the script.
    pub fn render_tags(&self) -> String {
        let mut html = String::new();
        for sheet in &self.stylesheets {
            html.push_str(&format!(
                "<link rel=\"stylesheet/less\" type=\"text/css\" href=\"{}\" />\n",
                escape_attr(&sheet.href)
            ));
        }

        let options = serde_json::to_string(&self.options)
            .unwrap_or_else(|_| "{}".to_string())
            .replace("</", "<\\/");
        html.push_str(&format!("<script>less = {};</script>\n", options));
        html.push_str(&format!(
            "<script src=\"{}\"></script>\n",
            escape_attr(&self.script_url)
        ));
        html
    }

    /// Write the manifest as JSON, atomically.
    pub fn write(&self, path: &Path) -> BuildResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(json.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Defers compilation to the browser.
#[derive(Debug, Clone, Default)]
pub struct ClientCompiler {
    client: ClientOptions,
}

impl ClientCompiler {
    pub fn new(client: ClientOptions) -> Self {
        Self { client }
    }

    /// Stylesheets in mapping order.
    pub fn stylesheets(&self, mappings: &[FileMapping]) -> Vec<ClientStylesheet> {
        mappings
            .iter()
            .map(|m| ClientStylesheet {
                href: to_url_path(&m.source),
                destination: to_url_path(&m.destination),
            })
            .collect()
    }

    pub fn manifest(&self, mappings: &[FileMapping], options: &CompilationOptions) -> ClientManifest {
        ClientManifest {
            script_url: self.client.script_url.clone(),
            options: LessJsOptions {
                env: self.client.env.clone(),
                rootpath: options.root_path.clone(),
                relative_urls: options.relative_urls,
            },
            stylesheets: self.stylesheets(mappings),
        }
    }

    /// Write the manifest if one is configured.
    pub fn write_manifest(
        &self,
        mappings: &[FileMapping],
        options: &CompilationOptions,
    ) -> BuildResult<()> {
        if let Some(path) = &self.client.manifest {
            self.manifest(mappings, options).write(path)?;
            info!(manifest = %path.display(), "wrote client manifest");
        }
        Ok(())
    }
}

impl CompilerStrategy for ClientCompiler {
    fn mode(&self) -> Mode {
        Mode::Client
    }

    fn run(&self, mappings: &[FileMapping], options: &CompilationOptions) -> RunReport {
        let files = mappings
            .iter()
            .map(|mapping| FileReport {
                mapping: mapping.clone(),
                source_path: options.source_path(mapping),
                destination_path: options.destination_path(mapping),
                outcome: CompileOutcome::Skipped(SkipReason::ClientSide),
            })
            .collect();

        RunReport {
            mode: Mode::Client,
            files,
        }
    }
}

/// Relative path with forward slashes, usable as a url.
fn to_url_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
