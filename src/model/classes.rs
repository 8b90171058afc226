//! Digit-to-class-name mapping.

use std::collections::BTreeMap;
use std::path::Path;

use serde_yaml::Value;

use crate::config::ConfigError;

/// Highest digit label an operator can assign.
pub const MAX_LABEL: u8 = 9;

/// Human-readable names for the digit labels.
///
/// Labels without a configured name fall back to the digit itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassNames {
    names: BTreeMap<u8, String>,
}

impl ClassNames {
    /// Build from explicit pairs, rejecting labels above [`MAX_LABEL`].
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (u8, S)>,
        S: Into<String>,
    {
        let mut names = BTreeMap::new();
        for (label, name) in pairs {
            if label > MAX_LABEL {
                return Err(ConfigError::invalid_class_key(label.to_string()));
            }
            names.insert(label, name.into());
        }
        Ok(Self { names })
    }

    /// Load a class-name file.
    ///
    /// The file is YAML (JSON parses as well) whose first top-level key maps
    /// digit keys to names:
    ///
    /// ```yaml
    /// classes:
    ///   0: dog
    ///   1: cat
    /// ```
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let classes = Self::parse(&text).map_err(|e| e.with_path(path))?;
        log::info!("Loaded {} class names from {:?}", classes.len(), path);
        Ok(classes)
    }

    /// Parse class-name file content.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let root: Value = serde_yaml::from_str(text)?;
        let Value::Mapping(root) = root else {
            return Err(ConfigError::invalid_class_file("top level is not a mapping"));
        };
        let Some((_, section)) = root.into_iter().next() else {
            return Err(ConfigError::invalid_class_file("file has no sections"));
        };
        let Value::Mapping(section) = section else {
            return Err(ConfigError::invalid_class_file(
                "first section is not a mapping of labels to names",
            ));
        };

        let mut names = BTreeMap::new();
        for (key, value) in section {
            let label = parse_label_key(&key)?;
            let name = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(ConfigError::invalid_class_file(format!(
                        "name for label {label} is not a scalar: {other:?}"
                    )));
                }
            };
            names.insert(label, name);
        }
        Ok(Self { names })
    }

    /// Class name for a label.
    pub fn name(&self, label: u8) -> String {
        self.names
            .get(&label)
            .cloned()
            .unwrap_or_else(|| label.to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Legend entries such as `CAT: 1`, one per configured label.
    pub fn legend(&self) -> Vec<String> {
        self.names
            .iter()
            .map(|(label, name)| format!("{}: {label}", name.to_uppercase()))
            .collect()
    }
}

fn parse_label_key(key: &Value) -> Result<u8, ConfigError> {
    let raw = match key {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => format!("{other:?}"),
    };
    match raw.parse::<u8>() {
        Ok(label) if label <= MAX_LABEL => Ok(label),
        _ => Err(ConfigError::invalid_class_key(raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_with_numeric_keys() {
        let classes = ClassNames::parse("classes:\n  0: dog\n  1: cat\n").unwrap();
        assert_eq!(classes.name(0), "dog");
        assert_eq!(classes.name(1), "cat");
        assert_eq!(classes.name(7), "7");
        assert_eq!(classes.legend(), vec!["DOG: 0", "CAT: 1"]);
    }

    #[test]
    fn test_parse_json_with_string_keys() {
        let classes = ClassNames::parse(r#"{"names": {"2": "bird", "9": "fish"}}"#).unwrap();
        assert_eq!(classes.name(2), "bird");
        assert_eq!(classes.name(9), "fish");
        assert_eq!(classes.len(), 2);
    }

    #[test]
    fn test_only_first_section_is_used() {
        let classes = ClassNames::parse("a:\n  1: one\nb:\n  1: uno\n  2: dos\n").unwrap();
        assert_eq!(classes.name(1), "one");
        assert_eq!(classes.name(2), "2");
    }

    #[test]
    fn test_out_of_range_key_is_rejected() {
        let err = ClassNames::parse("classes:\n  10: ten\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidClassKey { .. }));
        assert!(ClassNames::parse("classes:\n  x: what\n").is_err());
    }

    #[test]
    fn test_non_mapping_is_rejected() {
        assert!(ClassNames::parse("- a\n- b\n").is_err());
        assert!(ClassNames::parse("classes: dog\n").is_err());
    }

    #[test]
    fn test_from_pairs() {
        let classes = ClassNames::from_pairs([(3, "ring")]).unwrap();
        assert_eq!(classes.name(3), "ring");
        assert!(ClassNames::from_pairs([(12, "no")]).is_err());
    }
}
