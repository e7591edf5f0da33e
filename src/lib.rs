pub mod config;
pub mod error;
pub mod manifest;
pub mod materialize;
pub mod project;
pub mod setup;
pub mod symbols;
pub mod target;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use console::style;
use tera::Value;
use tracing::info;

use crate::error::{Result, ScaffoldError};
use crate::manifest::{render_manifest, ManifestReader, DEFAULT_MANIFEST};
use crate::materialize::{materialize, plan_entries, Layout, PlannedEntry, TeraRenderer};
use crate::project::{ProjectFile, ProjectHandle};
use crate::symbols::Symbols;

pub struct ScaffoldOptions {
    /// Directory holding the template files.
    pub templates: PathBuf,
    /// Directory the project is created in.
    pub out: PathBuf,
    pub project_name: String,
    /// Manifest file. Defaults to `Templates.inf` inside `templates`.
    pub manifest: Option<PathBuf>,
    /// Optional TOML symbols file.
    pub symbols_file: Option<PathBuf>,
    /// `KEY=VALUE` symbols, applied over the symbols file.
    pub symbols: Vec<(String, Value)>,
    /// Allow scaffolding into a non-empty directory.
    pub overwrite: bool,
}

impl ScaffoldOptions {
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest
            .clone()
            .unwrap_or_else(|| self.templates.join(DEFAULT_MANIFEST))
    }

    fn layout(&self) -> Layout {
        Layout {
            templates_dir: self.templates.clone(),
            project_dir: self.out.clone(),
            project_name: self.project_name.clone(),
        }
    }

    fn build_symbols(&self) -> Result<Symbols> {
        check_project_name(&self.project_name)?;
        let mut overrides: BTreeMap<String, Value> = match &self.symbols_file {
            Some(path) => config::load_symbols_file(path)?,
            None => BTreeMap::new(),
        };
        overrides.extend(self.symbols.iter().cloned());
        Ok(Symbols::new(
            &self.project_name,
            &self.out,
            &self.templates,
            overrides,
        ))
    }
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct ScaffoldReport {
    pub project_dir: PathBuf,
    pub project_file: PathBuf,
    /// Registered files, in manifest order.
    pub files: Vec<String>,
    pub rendered: usize,
    pub copied: usize,
}

/// Resolve the manifest into planned entries without writing anything.
pub fn plan_scaffold(options: &ScaffoldOptions) -> Result<Vec<PlannedEntry>> {
    require_dir(&options.templates)?;
    let symbols = options.build_symbols()?;
    let manifest = render_manifest(&options.manifest_path(), &symbols)?;
    let plan = plan_entries(ManifestReader::open(manifest.path())?, &options.layout())?;
    close_manifest(manifest)?;
    Ok(plan)
}

/// Create the project: configure it, materialize every manifest entry, and save it.
///
/// The first failure aborts the run. Files materialized before it remain on disk.
pub fn scaffold(options: &ScaffoldOptions) -> Result<ScaffoldReport> {
    require_dir(&options.templates)?;
    check_output_dir(&options.out, options.overwrite)?;
    let symbols = options.build_symbols()?;

    std::fs::create_dir_all(&options.out).map_err(|e| ScaffoldError::Io {
        context: format!("creating project directory {}", options.out.display()),
        source: e,
    })?;

    let mut project = ProjectFile::new(&options.project_name, &options.out);
    setup::add_configurations(&mut project, &symbols)?;
    setup::add_filters(&mut project)?;

    let manifest = render_manifest(&options.manifest_path(), &symbols)?;
    let renderer = TeraRenderer::new(&symbols);
    let result = materialize(
        ManifestReader::open(manifest.path())?,
        &options.layout(),
        &renderer,
        &mut project,
    )?;
    info!(files = result.len(), "materialized manifest");

    setup::apply_file_settings(&mut project, &symbols)?;
    close_manifest(manifest)?;

    let project_file = project.save()?;

    println!(
        "\n{} Project {} created at {}",
        style("✓").green().bold(),
        style(&options.project_name).bold(),
        style(options.out.display()).cyan()
    );
    println!(
        "  {} files rendered, {} files copied",
        result.rendered.len(),
        result.copied.len()
    );

    Ok(ScaffoldReport {
        project_dir: options.out.clone(),
        project_file,
        files: project.files().into_iter().map(String::from).collect(),
        rendered: result.rendered.len(),
        copied: result.copied.len(),
    })
}

fn require_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ScaffoldError::ResourceUnavailable {
            path: path.to_path_buf(),
            reason: "template directory not found".into(),
        })
    }
}

fn check_output_dir(out: &Path, overwrite: bool) -> Result<()> {
    if out.exists() && !overwrite {
        // An empty dir is fine
        let mut entries = std::fs::read_dir(out).map_err(|e| ScaffoldError::Io {
            context: format!("reading output directory {}", out.display()),
            source: e,
        })?;
        if entries.next().is_some() {
            return Err(ScaffoldError::OutputExists {
                path: out.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// The project name becomes part of file names, so it must be a single plain component.
fn check_project_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).components().count() == 1;
    if valid {
        Ok(())
    } else {
        Err(ScaffoldError::InvalidSymbol {
            input: format!("{}={name}", symbols::PROJECT_NAME),
        })
    }
}

fn close_manifest(manifest: tempfile::NamedTempFile) -> Result<()> {
    let path = manifest.path().to_path_buf();
    manifest.close().map_err(|e| ScaffoldError::Io {
        context: format!("removing temporary manifest {}", path.display()),
        source: e,
    })
}
