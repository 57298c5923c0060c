//! Project configuration management for `docweave.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section    # [content], [output], [html]
//! ├── error      # ConfigError, ConfigDiagnostics
//! ├── util       # config discovery, path resolution
//! └── mod.rs     # DocConfig (this file)
//! ```
//!
//! # Keys
//!
//! | Key                | Purpose                                        |
//! |--------------------|------------------------------------------------|
//! | `locale`           | Target locale for absolute-path links          |
//! | `repository`       | Provenance recorded on every resolved document |
//! | `[content]`        | Docset root and fallback roots                 |
//! | `[output]`         | Output root                                    |
//! | `[html]`           | Post-processing switches                       |

mod error;
mod section;
mod util;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use section::{ContentConfig, HtmlConfig, OutputConfig};

use crate::cli::{BuildArgs, Cli};
use crate::core::is_locale_tag;
use crate::vfs::{LayeredReader, PROP_REPOSITORY, RootReader, RootWriter, VirtualFileLayer};
use crate::{debug, log};
use anyhow::{Context, Result, anyhow};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::{find_config_file, normalize_path, resolve_against};

/// Root configuration structure representing docweave.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    pub locale: String,

    pub repository: Option<String>,

    pub content: ContentConfig,

    pub output: OutputConfig,

    pub html: HtmlConfig,
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            locale: "en-us".into(),
            repository: None,
            content: ContentConfig::default(),
            output: OutputConfig::default(),
            html: HtmlConfig::default(),
        }
    }
}

impl DocConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from the current directory for the config file. Paths
    /// in the file are relative to its directory; CLI paths are relative to
    /// the current directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let config_path = find_config_file(&cli.config, &cwd).ok_or_else(|| {
            anyhow!(
                "Config file '{}' not found in '{}' or any parent directory",
                cli.config.display(),
                cwd.display()
            )
        })?;

        let mut config = Self::from_path(&config_path)?;
        config.finalize(config_path);
        if let Some(args) = cli.build_args() {
            config.apply_build_args(args, &cwd);
        }
        config.validate()?;

        debug!("config"; "loaded {}", config.config_path.display());
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            log!("warning"; "unknown fields in {} ignored: {}", path.display(), ignored.join(", "));
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Record the config location and resolve file paths against it.
    fn finalize(&mut self, config_path: PathBuf) {
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        self.content.docset = resolve_against(&root, &self.content.docset);
        for fallback in &mut self.content.fallback {
            *fallback = resolve_against(&root, fallback);
        }
        self.output.dir = resolve_against(&root, &self.output.dir);

        self.root = root;
        self.config_path = config_path;
    }

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs, cwd: &Path) {
        crate::logger::set_verbose(args.verbose);

        if let Some(locale) = &args.locale {
            self.locale.clone_from(locale);
        }
        if let Some(output) = &args.output {
            self.output.dir = resolve_against(cwd, output);
        }
        self.output.clean = args.clean;
        Self::update_option(&mut self.html.link_type, args.link_type.as_ref());
        Self::update_option(&mut self.html.strip_tags, args.strip_tags.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate the resolved configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        if self.locale.trim().is_empty() {
            diag.error("locale", "must not be empty");
        } else if !is_locale_tag(&self.locale) {
            diag.warn(
                "locale",
                format!("`{}` does not look like a locale tag (e.g. en-us)", self.locale),
            );
        }

        if self.content.docset.as_os_str().is_empty() {
            diag.error("content.docset", "must not be empty");
        }
        let output = normalize_path(&self.output.dir);
        for root in self.content.roots() {
            if !root.is_dir() {
                let field = if root == self.content.docset {
                    "content.docset"
                } else {
                    "content.fallback"
                };
                diag.error_with_hint(
                    field,
                    format!("`{}` is not a directory", root.display()),
                    "paths are relative to the directory of docweave.toml",
                );
            }
            // Nested either way, a build would read back its own output
            let normalized = normalize_path(root);
            if output.starts_with(&normalized) || normalized.starts_with(&output) {
                diag.error_with_hint(
                    "output.dir",
                    format!("`{}` overlaps content root `{}`", self.output.dir.display(), root.display()),
                    "place the output directory outside every content root",
                );
            }
        }

        if self.html.extensions.is_empty() {
            diag.warn("html.extensions", "empty: no document will be post-processed");
        }

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Provenance properties shared by every content root.
    fn root_properties(&self) -> FxHashMap<String, String> {
        let mut properties = FxHashMap::default();
        if let Some(repository) = &self.repository {
            properties.insert(PROP_REPOSITORY.to_string(), repository.clone());
        }
        properties
    }

    /// Reader over all content roots (docset first) plus a writer on the
    /// output root.
    pub fn build_layer(&self) -> VirtualFileLayer {
        let reader = self.content.roots().fold(LayeredReader::new(), |reader, root| {
            reader.push(RootReader::with_properties(root, self.root_properties()))
        });
        VirtualFileLayer::new(reader).with_writer(RootWriter::new(&self.output.dir))
    }

    /// Whether a document is post-processed as HTML.
    pub fn is_html(&self, path: &crate::vfs::RelativePath) -> bool {
        self.html.is_html(path)
    }
}
