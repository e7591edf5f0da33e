pub mod schema;

use std::collections::BTreeMap;
use std::path::Path;

use tera::Value;

use crate::error::{Result, ScaffoldError};

pub use schema::SymbolsFile;

/// Load a symbols file and convert its values for the template context.
pub fn load_symbols_file(path: &Path) -> Result<BTreeMap<String, Value>> {
    if !path.exists() {
        return Err(ScaffoldError::ResourceUnavailable {
            path: path.to_path_buf(),
            reason: "symbols file not found".into(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ScaffoldError::Io {
        context: format!("reading {}", path.display()),
        source: e,
    })?;

    parse_symbols(&content).map_err(|e| ScaffoldError::SymbolsParse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_symbols(content: &str) -> std::result::Result<BTreeMap<String, Value>, toml::de::Error> {
    let file: SymbolsFile = toml::from_str(content)?;
    Ok(file
        .symbols
        .into_iter()
        .map(|(key, value)| (key, toml_to_value(value)))
        .collect())
}

fn toml_to_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_value).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_value(v)))
                .collect(),
        ),
    }
}
