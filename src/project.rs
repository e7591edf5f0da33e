use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScaffoldError};

/// Suffix of the file [`ProjectFile::save`] writes.
pub const PROJECT_FILE_SUFFIX: &str = ".scaffold.toml";

pub type Properties = BTreeMap<String, toml::Value>;

/// Destination project that materialized files are registered with.
///
/// Property names and values are opaque to this crate; they are stored and
/// persisted as given.
pub trait ProjectHandle {
    fn add_file(&mut self, path: &Path) -> Result<()>;

    fn add_filter(&mut self, name: &str, patterns: &str) -> Result<()>;

    /// Get or create a named build configuration.
    fn configuration(&mut self, name: &str) -> &mut Configuration;

    /// Per-file settings for a file already added to the project.
    fn file_configuration(&mut self, file: &str, config: &str) -> Result<&mut FileConfiguration>;

    fn contains_file(&self, file: &str) -> bool;

    fn save(&self) -> Result<PathBuf>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(flatten)]
    pub properties: Properties,
}

impl ToolSettings {
    pub fn set(&mut self, key: &str, value: impl Into<toml::Value>) -> &mut Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.properties.get(key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(flatten)]
    pub properties: Properties,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tools: BTreeMap<String, ToolSettings>,
}

impl Configuration {
    pub fn set(&mut self, key: &str, value: impl Into<toml::Value>) -> &mut Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.properties.get(key)
    }

    pub fn tool(&mut self, name: &str) -> &mut ToolSettings {
        self.tools.entry(name.to_string()).or_default()
    }
}

/// Settings of one file under one configuration, optionally bound to a specific tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,

    #[serde(flatten)]
    pub properties: Properties,
}

impl FileConfiguration {
    pub fn set(&mut self, key: &str, value: impl Into<toml::Value>) -> &mut Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.properties.get(key)
    }

    /// Bind the file to `tool`, discarding settings made for a previous tool.
    pub fn use_tool(&mut self, tool: &str) -> &mut Self {
        if self.tool.as_deref() != Some(tool) {
            self.properties.clear();
            self.tool = Some(tool.to_string());
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub name: String,
    pub patterns: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectItem {
    pub path: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub configurations: BTreeMap<String, FileConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    pub name: String,

    #[serde(default)]
    pub filters: Vec<Filter>,

    #[serde(default)]
    pub files: Vec<ProjectItem>,

    #[serde(default)]
    pub configurations: BTreeMap<String, Configuration>,
}

/// A project persisted as `<dir>/<name>.scaffold.toml`.
pub struct ProjectFile {
    dir: PathBuf,
    document: ProjectDocument,
}

impl ProjectFile {
    pub fn new(name: &str, dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            document: ProjectDocument {
                name: name.to_string(),
                ..ProjectDocument::default()
            },
        }
    }

    /// Read a previously saved project file.
    pub fn load(path: &Path) -> Result<ProjectDocument> {
        let content = std::fs::read_to_string(path).map_err(|e| ScaffoldError::Io {
            context: format!("reading {}", path.display()),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ScaffoldError::Io {
            context: format!("parsing {}", path.display()),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })
    }

    pub fn document(&self) -> &ProjectDocument {
        &self.document
    }

    /// Registered file paths, in registration order.
    pub fn files(&self) -> Vec<&str> {
        self.document.files.iter().map(|f| f.path.as_str()).collect()
    }

    pub fn path(&self) -> PathBuf {
        self.dir
            .join(format!("{}{PROJECT_FILE_SUFFIX}", self.document.name))
    }

    fn relative(&self, path: &Path) -> Option<String> {
        path.strip_prefix(&self.dir)
            .ok()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
    }
}

impl ProjectHandle for ProjectFile {
    fn add_file(&mut self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(ScaffoldError::RegistrationFailed {
                path: path.to_path_buf(),
                reason: "file does not exist".into(),
            });
        }

        let Some(relative) = self.relative(path) else {
            return Err(ScaffoldError::RegistrationFailed {
                path: path.to_path_buf(),
                reason: format!("file is outside {}", self.dir.display()),
            });
        };
        if self.contains_file(&relative) {
            return Err(ScaffoldError::RegistrationFailed {
                path: path.to_path_buf(),
                reason: "file is already part of the project".into(),
            });
        }

        self.document.files.push(ProjectItem {
            path: relative,
            configurations: BTreeMap::new(),
        });
        Ok(())
    }

    fn add_filter(&mut self, name: &str, patterns: &str) -> Result<()> {
        if let Some(existing) = self.document.filters.iter_mut().find(|f| f.name == name) {
            existing.patterns = patterns.to_string();
        } else {
            self.document.filters.push(Filter {
                name: name.to_string(),
                patterns: patterns.to_string(),
            });
        }
        Ok(())
    }

    fn configuration(&mut self, name: &str) -> &mut Configuration {
        self.document
            .configurations
            .entry(name.to_string())
            .or_default()
    }

    fn file_configuration(&mut self, file: &str, config: &str) -> Result<&mut FileConfiguration> {
        let item = self
            .document
            .files
            .iter_mut()
            .find(|f| f.path == file)
            .ok_or_else(|| ScaffoldError::ProjectFileMissing {
                file: file.to_string(),
            })?;
        Ok(item.configurations.entry(config.to_string()).or_default())
    }

    fn contains_file(&self, file: &str) -> bool {
        self.document.files.iter().any(|f| f.path == file)
    }

    fn save(&self) -> Result<PathBuf> {
        let path = self.path();
        let content = toml::to_string_pretty(&self.document).map_err(|e| ScaffoldError::Io {
            context: format!("serializing {}", path.display()),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        std::fs::write(&path, content).map_err(|e| ScaffoldError::Io {
            context: format!("writing {}", path.display()),
            source: e,
        })?;
        Ok(path)
    }
}
