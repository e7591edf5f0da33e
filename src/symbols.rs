use std::collections::BTreeMap;
use std::path::Path;

use tera::{Context, Value};

use crate::error::{Result, ScaffoldError};

pub const PROJECT_NAME: &str = "PROJECT_NAME";
pub const PROJECT_PATH: &str = "PROJECT_PATH";
pub const TEMPLATES_PATH: &str = "TEMPLATES_PATH";
pub const TLB_NAME: &str = "TLB_NAME";
pub const UNICODE: &str = "UNICODE";
pub const DLL_LINK: &str = "DLL_LINK";
pub const OPTIMIZE_PPRO: &str = "OPTIMIZE_PPRO";

/// Read-only symbol environment shared by every scaffolding step.
#[derive(Debug, Clone)]
pub struct Symbols {
    values: BTreeMap<String, Value>,
}

impl Symbols {
    /// Build the environment from user-supplied symbols and the three path built-ins.
    ///
    /// Built-ins always win over `overrides`; `TLB_NAME` and the feature flags
    /// only receive defaults when `overrides` leaves them unset.
    pub fn new(
        project_name: &str,
        project_path: &Path,
        templates_path: &Path,
        overrides: BTreeMap<String, Value>,
    ) -> Self {
        let mut values = BTreeMap::new();
        values.insert(TLB_NAME.to_string(), Value::String(project_name.to_string()));
        for flag in [UNICODE, DLL_LINK, OPTIMIZE_PPRO] {
            values.insert(flag.to_string(), Value::Bool(false));
        }

        values.extend(overrides);

        values.insert(
            PROJECT_NAME.to_string(),
            Value::String(project_name.to_string()),
        );
        values.insert(
            PROJECT_PATH.to_string(),
            Value::String(project_path.display().to_string()),
        );
        values.insert(
            TEMPLATES_PATH.to_string(),
            Value::String(templates_path.display().to_string()),
        );

        Self { values }
    }

    pub fn find(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Look up a symbol that must be a string.
    pub fn str_value(&self, name: &str) -> Result<&str> {
        self.find(name)
            .and_then(Value::as_str)
            .ok_or_else(|| ScaffoldError::MissingSymbol {
                name: name.to_string(),
            })
    }

    /// Truthiness of a feature flag. Missing symbols are false.
    pub fn flag(&self, name: &str) -> bool {
        match self.find(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
            Some(Value::String(s)) => !s.is_empty() && s != "false" && s != "0",
            Some(Value::Null) | None => false,
            Some(_) => true,
        }
    }

    pub fn project_name(&self) -> &str {
        self.values
            .get(PROJECT_NAME)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn to_context(&self) -> Context {
        let mut context = Context::new();
        for (key, value) in &self.values {
            context.insert(key, value);
        }
        context
    }
}

/// Parse a `KEY=VALUE` command-line symbol.
///
/// `true`/`false` become booleans and integers become numbers; anything else
/// stays a string.
pub fn parse_symbol(input: &str) -> Result<(String, Value)> {
    let Some((key, raw)) = input.split_once('=') else {
        return Err(ScaffoldError::InvalidSymbol {
            input: input.to_string(),
        });
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(ScaffoldError::InvalidSymbol {
            input: input.to_string(),
        });
    }

    let value = match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match raw.parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(raw.to_string()),
        },
    };
    Ok((key.to_string(), value))
}
