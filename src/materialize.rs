use std::path::{Component, Path, PathBuf};

use tera::{Context, Tera};
use tracing::debug;

use crate::error::{RenderError, Result, ScaffoldError};
use crate::manifest::ManifestEntry;
use crate::project::ProjectHandle;
use crate::symbols::Symbols;
use crate::target;

/// Extensions copied byte-for-byte instead of rendered. Matched case-sensitively.
pub const COPY_ONLY_EXTENSIONS: &[&str] = &[".bmp", ".ico", ".gif", ".rtf", ".css"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializePolicy {
    Copy,
    Render,
}

impl MaterializePolicy {
    pub fn for_name(logical_name: &str) -> Self {
        let is_copy = logical_name
            .rfind('.')
            .map(|dot| &logical_name[dot..])
            .is_some_and(|ext| COPY_ONLY_EXTENSIONS.contains(&ext));
        if is_copy {
            Self::Copy
        } else {
            Self::Render
        }
    }

    pub fn is_copy(self) -> bool {
        self == Self::Copy
    }
}

/// Writes one template file to its destination.
pub trait TemplateRenderer {
    /// In copy-only mode `source` is copied verbatim, otherwise it is rendered.
    fn render(
        &self,
        source: &Path,
        destination: &Path,
        copy_only: bool,
    ) -> std::result::Result<(), RenderError>;
}

/// Renders templates with Tera against the symbol environment.
pub struct TeraRenderer {
    context: Context,
}

impl TeraRenderer {
    pub fn new(symbols: &Symbols) -> Self {
        Self {
            context: symbols.to_context(),
        }
    }
}

impl TemplateRenderer for TeraRenderer {
    fn render(
        &self,
        source: &Path,
        destination: &Path,
        copy_only: bool,
    ) -> std::result::Result<(), RenderError> {
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if copy_only {
            std::fs::copy(source, destination)?;
            return Ok(());
        }

        let content = std::fs::read_to_string(source)?;
        let template_name = source.to_string_lossy();
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(&template_name, &content)?;
        let rendered = tera.render(&template_name, &self.context)?;
        std::fs::write(destination, rendered)?;
        Ok(())
    }
}

/// Where templates come from and where the project goes.
#[derive(Debug, Clone)]
pub struct Layout {
    pub templates_dir: PathBuf,
    pub project_dir: PathBuf,
    pub project_name: String,
}

/// A manifest entry resolved to concrete paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    pub logical_name: String,
    pub target_name: String,
    pub policy: MaterializePolicy,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl Layout {
    /// Resolve an entry to paths under the template and project directories.
    ///
    /// Names that are absolute or climb out with `..` are rejected.
    pub fn plan(&self, entry: &ManifestEntry) -> Result<PlannedEntry> {
        let target_name = target::resolve(&entry.name, &self.project_name);
        for name in [&entry.name, &target_name] {
            if !is_contained(name) {
                return Err(ScaffoldError::MaterializationFailed {
                    name: entry.name.clone(),
                    source: RenderError::UnsafePath(name.clone()),
                });
            }
        }
        Ok(PlannedEntry {
            source: self.templates_dir.join(&entry.name),
            destination: self.project_dir.join(&target_name),
            policy: MaterializePolicy::for_name(&entry.name),
            logical_name: entry.name.clone(),
            target_name,
        })
    }
}

fn is_contained(name: &str) -> bool {
    Path::new(name)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Files produced by a materialization run, in manifest order.
#[derive(Debug, Default)]
pub struct Materialized {
    pub rendered: Vec<PathBuf>,
    pub copied: Vec<PathBuf>,
}

impl Materialized {
    pub fn len(&self) -> usize {
        self.rendered.len() + self.copied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve every entry without touching the filesystem.
pub fn plan_entries<I>(entries: I, layout: &Layout) -> Result<Vec<PlannedEntry>>
where
    I: IntoIterator<Item = Result<ManifestEntry>>,
{
    entries
        .into_iter()
        .map(|entry| entry.and_then(|e| layout.plan(&e)))
        .collect()
}

/// Materialize each entry and register it with the project, strictly in order.
///
/// Stops at the first failure; files already written stay in place.
pub fn materialize<I, R, P>(
    entries: I,
    layout: &Layout,
    renderer: &R,
    project: &mut P,
) -> Result<Materialized>
where
    I: IntoIterator<Item = Result<ManifestEntry>>,
    R: TemplateRenderer + ?Sized,
    P: ProjectHandle + ?Sized,
{
    let mut result = Materialized::default();

    for entry in entries {
        let planned = layout.plan(&entry?)?;

        renderer
            .render(
                &planned.source,
                &planned.destination,
                planned.policy.is_copy(),
            )
            .map_err(|e| ScaffoldError::MaterializationFailed {
                name: planned.logical_name.clone(),
                source: e,
            })?;

        project.add_file(&planned.destination)?;

        debug!(
            template = %planned.logical_name,
            target = %planned.target_name,
            copy = planned.policy.is_copy(),
            "materialized"
        );

        match planned.policy {
            MaterializePolicy::Copy => result.copied.push(planned.destination),
            MaterializePolicy::Render => result.rendered.push(planned.destination),
        }
    }

    Ok(result)
}
