use std::path::Path;

use anyhow::{bail, Context};
use serde::Deserialize;
use serde_json::Value;
use weft_ast::Conventions;

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub conventions: Conventions,
    pub pretty: bool,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config `{}`", path.display()))?;
        let value = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config `{}`", path.display()))?;
        Self::new(value)
    }

    /// Fields missing from `value` keep their default.
    pub fn new(mut value: Value) -> anyhow::Result<Self> {
        let Value::Object(fields) = &mut value else {
            bail!("json::Value is not an object!");
        };

        let mut config = Config::default();
        let conventions = &mut config.conventions;

        read_field(fields, "typeField", &mut conventions.type_field)?;
        read_field(fields, "refField", &mut conventions.ref_field)?;
        read_field(fields, "pathPrefix", &mut conventions.path_prefix)?;
        read_field(fields, "segmentSeparator", &mut conventions.segment_separator)?;
        read_field(fields, "indexMarker", &mut conventions.index_marker)?;
        read_field(fields, "pretty", &mut config.pretty)?;

        for name in fields.keys() {
            log::warn!("Unknown field config.{name}");
        }

        Ok(config)
    }
}

fn read_field<T: for<'de> Deserialize<'de>>(
    fields: &mut serde_json::Map<String, Value>,
    name: &str,
    slot: &mut T,
) -> anyhow::Result<()> {
    let Some(field) = fields.remove(name) else {
        return Ok(());
    };

    let typename = std::any::type_name::<T>();
    *slot = serde_json::from_value::<T>(field.clone())
        .with_context(|| format!("Expected type {typename}, got {field}"))
        .with_context(|| format!("Invalid field config.{name}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new(json!({})).unwrap();
        assert_eq!(config.conventions, Conventions::default());
        assert!(!config.pretty);
    }

    #[test]
    fn partial_override() {
        let config = Config::new(json!({
            "refField": "$path",
            "indexMarker": ":",
            "pretty": true
        }))
        .unwrap();

        assert_eq!(config.conventions.type_field, "$type");
        assert_eq!(config.conventions.ref_field, "$path");
        assert_eq!(config.conventions.index_marker, ':');
        assert!(config.pretty);
    }

    #[test]
    fn wrong_type() {
        let err = Config::new(json!({ "pathPrefix": "##" })).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("config.pathPrefix"), "{message}");
        assert!(message.contains("Expected type char"), "{message}");
    }

    #[test]
    fn not_an_object() {
        assert!(Config::new(json!([1, 2])).is_err());
    }
}
