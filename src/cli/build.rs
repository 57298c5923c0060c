//! Docset assembly.
//!
//! Build pipeline phases:
//! - **Init** - optional clean, layer construction, input listing
//! - **Process** - parallel HTML post-processing and file copying
//! - **Manifest** - per-document metadata written to `manifest.json`
//! - **Finalize** - layer disposal, summary, failure report

use crate::{
    config::DocConfig,
    debug,
    html::{
        HtmlDocument, add_link_type, bookmarks, count_words, remove_rerun_codepen_iframes,
        strip_tags,
    },
    log,
    logger::ProgressLine,
    vfs::{PROP_CONTENT_ROOT, RelativePath, VirtualFileLayer},
};
use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use serde::Serialize;
use std::{collections::BTreeMap, fs};

/// Logical path of the metadata manifest in the output root.
pub const MANIFEST_PATH: &str = "manifest.json";

/// Metadata for one post-processed document.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub path: RelativePath,
    pub word_count: usize,
    pub bookmarks: Vec<String>,
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct Manifest {
    pub locale: String,
    pub documents: Vec<ManifestEntry>,
}

/// Outcome of a build that ran to completion.
#[derive(Debug)]
pub struct BuildReport {
    pub manifest: Manifest,
    pub copied: usize,
    pub failures: Vec<(RelativePath, String)>,
}

enum Processed {
    Html(ManifestEntry),
    Copied,
}

/// Apply the enabled HTML transforms in pipeline order.
pub fn post_process(html: &str, config: &DocConfig) -> String {
    let mut html = html.to_string();
    if config.html.strip_tags {
        html = strip_tags(&html);
    }
    if config.html.codepen {
        html = remove_rerun_codepen_iframes(&html);
    }
    if config.html.link_type {
        html = add_link_type(&html, &config.locale);
    }
    html
}

/// Build the docset. Fails if any document failed.
pub fn build_docs(config: &DocConfig) -> Result<BuildReport> {
    let report = assemble(config)?;

    log!(
        "build";
        "{} processed, {} copied, {} words",
        plural_count(report.manifest.documents.len(), "document"),
        plural_count(report.copied, "file"),
        report.manifest.documents.iter().map(|d| d.word_count).sum::<usize>()
    );

    if !report.failures.is_empty() {
        for (path, error) in &report.failures {
            log!("error"; "{}: {}", path, error);
        }
        bail!("{} failed", plural_count(report.failures.len(), "document"));
    }
    Ok(report)
}

/// Run the pipeline, collecting per-document failures instead of aborting.
pub fn assemble(config: &DocConfig) -> Result<BuildReport> {
    if config.output.clean && config.output.dir.exists() {
        fs::remove_dir_all(&config.output.dir).with_context(|| {
            format!("Failed to clean output directory {}", config.output.dir.display())
        })?;
    }

    let mut layer = config.build_layer();
    let inputs = layer.list_inputs()?;
    let html_count = inputs.iter().filter(|p| config.is_html(p)).count();

    log!("build"; "{} from {}", plural_count(inputs.len(), "input"), plural_count(config.content.roots().count(), "root"));
    let progress = ProgressLine::new(&[("html", html_count), ("copy", inputs.len() - html_count)]);

    let results: Vec<_> = inputs
        .par_iter()
        .map(|path| {
            let result = process(&layer, config, path);
            if let Ok(done) = &result {
                progress.inc(match done {
                    Processed::Html(_) => "html",
                    Processed::Copied => "copy",
                });
            }
            (path, result)
        })
        .collect();
    progress.finish();

    let mut documents = Vec::with_capacity(html_count);
    let mut copied = 0;
    let mut failures = Vec::new();
    for (path, result) in results {
        match result {
            Ok(Processed::Html(entry)) => documents.push(entry),
            Ok(Processed::Copied) => copied += 1,
            Err(e) => failures.push((path.clone(), format!("{e:#}"))),
        }
    }

    let manifest = Manifest {
        locale: config.locale.clone(),
        documents,
    };
    write_manifest(&layer, &manifest)?;

    layer.dispose();
    Ok(BuildReport {
        manifest,
        copied,
        failures,
    })
}

fn process(layer: &VirtualFileLayer, config: &DocConfig, path: &RelativePath) -> Result<Processed> {
    if !config.is_html(path) {
        layer.copy(path, path)?;
        return Ok(Processed::Copied);
    }

    let source = layer.read_to_string(path)?;
    let output = post_process(&source, config);

    let doc = HtmlDocument::parse(&output).with_context(|| format!("Failed to parse {path}"))?;
    let properties = layer.properties(path)?;
    debug!(
        "build";
        "{} <- {}",
        path,
        properties.get(PROP_CONTENT_ROOT).map_or("?", String::as_str)
    );

    let entry = ManifestEntry {
        path: path.clone(),
        word_count: count_words(&doc),
        bookmarks: bookmarks(&doc),
        properties: properties
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    };

    layer.write(path, output.as_bytes())?;
    Ok(Processed::Html(entry))
}

fn write_manifest(layer: &VirtualFileLayer, manifest: &Manifest) -> Result<()> {
    let path = RelativePath::new(MANIFEST_PATH)?;
    let json = serde_json::to_vec_pretty(manifest).context("Failed to serialize manifest")?;
    layer.write(&path, &json)?;
    debug!("build"; "wrote {}", path);
    Ok(())
}

/// Format count with noun, handling pluralization
fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", if count == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, path: &str, content: &[u8]) {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn setup() -> (TempDir, DocConfig) {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("docs");
        let shared = dir.path().join("shared");

        write(
            &docs,
            "index.html",
            b"<h1 id='top' style='color:red'>Hello world</h1><style>h1{}</style><a href='/guide/a.html'>Guide</a>",
        );
        write(&docs, "media/logo.png", b"png");
        write(&shared, "index.html", b"<p>shadowed</p>");
        write(
            &shared,
            "includes/embed.html",
            b"<iframe src='//codepen.io/x'></iframe><a name='note'>Shared note</a>",
        );

        let mut config = DocConfig::default();
        config.locale = "zh-cn".into();
        config.repository = Some("https://example.com/shared.git".into());
        config.content.docset = docs;
        config.content.fallback = vec![shared];
        config.output.dir = dir.path().join("out");
        (dir, config)
    }

    fn read(dir: &TempDir, path: &str) -> String {
        fs::read_to_string(dir.path().join("out").join(path)).unwrap()
    }

    #[test]
    fn test_post_process_order() {
        let config = setup().1;
        assert_eq!(
            post_process("<a href='/a' style='x'>a</a><script>1</script>", &config),
            "<a href='/zh-cn/a' data-linktype='absolute-path'>a</a>"
        );
    }

    #[test]
    fn test_post_process_respects_switches() {
        let mut config = setup().1;
        config.html.strip_tags = false;
        config.html.link_type = false;
        let html = "<a href='/a' style='x'>a</a>";
        assert_eq!(post_process(html, &config), html);
    }

    #[test]
    fn test_build_outputs_and_manifest() {
        let (dir, config) = setup();
        let report = build_docs(&config).unwrap();

        assert_eq!(report.copied, 1);
        assert!(report.failures.is_empty());
        assert_eq!(
            read(&dir, "index.html"),
            "<h1 id='top'>Hello world</h1><a href='/zh-cn/guide/a.html' data-linktype='absolute-path'>Guide</a>"
        );
        assert_eq!(
            read(&dir, "includes/embed.html"),
            "<iframe src='//codepen.io/x&rerun-position=hidden&'></iframe><a name='note'>Shared note</a>"
        );
        assert_eq!(read(&dir, "media/logo.png"), "png");

        let paths: Vec<_> = report.manifest.documents.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["includes/embed.html", "index.html"]);

        let index = &report.manifest.documents[1];
        assert_eq!(index.word_count, 3);
        assert_eq!(index.bookmarks, vec!["top"]);
        assert_eq!(
            index.properties.get("content_root"),
            Some(&config.content.docset.display().to_string())
        );

        let embed = &report.manifest.documents[0];
        assert_eq!(embed.bookmarks, vec!["note"]);
        assert_eq!(
            embed.properties.get("repository").map(String::as_str),
            Some("https://example.com/shared.git")
        );

        let manifest: serde_json::Value = serde_json::from_str(&read(&dir, MANIFEST_PATH)).unwrap();
        assert_eq!(manifest["locale"], "zh-cn");
        assert_eq!(manifest["documents"][1]["path"], "index.html");
        assert_eq!(manifest["documents"][1]["word_count"], 3);
    }

    #[test]
    fn test_failures_are_collected() {
        let (dir, config) = setup();
        write(&config.content.docset, "broken.html", &[0xff, 0xfe, 0x00]);

        let report = assemble(&config).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0.as_str(), "broken.html");
        // Other documents are still written
        assert_eq!(report.manifest.documents.len(), 2);
        assert!(dir.path().join("out/index.html").is_file());

        assert!(build_docs(&config).is_err());
    }

    #[test]
    fn test_clean_removes_stale_output() {
        let (dir, mut config) = setup();
        write(&dir.path().join("out"), "stale.html", b"old");

        config.output.clean = true;
        build_docs(&config).unwrap();
        assert!(!dir.path().join("out/stale.html").exists());
        assert!(dir.path().join("out/index.html").is_file());
    }

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "file"), "0 files");
        assert_eq!(plural_count(1, "file"), "1 file");
        assert_eq!(plural_count(5, "document"), "5 documents");
    }
}
