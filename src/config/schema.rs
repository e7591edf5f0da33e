use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Contents of a symbols file passed with `--symbols`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SymbolsFile {
    #[serde(default)]
    pub symbols: BTreeMap<String, toml::Value>,
}
