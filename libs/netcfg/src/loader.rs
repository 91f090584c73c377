//! Network-config document parsing.

use std::fs;
use std::path::Path;

use netres_events::{ConfigClass, ConfigSubject, SubjectKind};
use serde_json::Value;

use crate::ConfigError;

const SECTIONS: &[(&str, SubjectKind)] = &[
    ("ports", SubjectKind::Port),
    ("devices", SubjectKind::Device),
    ("apps", SubjectKind::App),
];

/// One document from a network-config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    pub subject: ConfigSubject,
    pub class: ConfigClass,
    pub node: Value,
}

impl ConfigEntry {
    /// Creates an entry.
    pub fn new(subject: ConfigSubject, class: ConfigClass, node: Value) -> Self {
        Self {
            subject,
            class,
            node,
        }
    }
}

/// Splits a network-config document into per-subject entries.
///
/// Only the `ports`, `devices` and `apps` sections are recognized. Document
/// validity is not checked here; the store does that on apply.
pub fn parse_network_config(doc: &Value) -> Result<Vec<ConfigEntry>, ConfigError> {
    let Value::Object(sections) = doc else {
        return Err(ConfigError::Document(
            "top level must be an object".to_string(),
        ));
    };

    let mut entries = Vec::new();
    for (section, subjects) in sections {
        let Some((_, kind)) = SECTIONS.iter().find(|(name, _)| name == section) else {
            return Err(ConfigError::Document(format!("unknown section '{section}'")));
        };

        let Value::Object(subjects) = subjects else {
            return Err(ConfigError::Document(format!(
                "section '{section}' must be an object"
            )));
        };

        for (subject_key, classes) in subjects {
            let subject = kind.parse_subject(subject_key)?;
            let Value::Object(classes) = classes else {
                return Err(ConfigError::Document(format!(
                    "subject '{subject_key}' must map class keys to documents"
                )));
            };

            for (class_key, node) in classes {
                entries.push(ConfigEntry::new(
                    subject.clone(),
                    ConfigClass::new(class_key.clone()),
                    node.clone(),
                ));
            }
        }
    }

    Ok(entries)
}

/// Reads and parses a network-config file.
pub fn read_network_config(path: &Path) -> Result<Vec<ConfigEntry>, ConfigError> {
    let raw = fs::read_to_string(path)?;
    let doc: Value = serde_json::from_str(&raw)?;
    parse_network_config(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_sections() {
        let doc = json!({
            "ports": {
                "of:1/1": { "bandwidthCapacity": { "capacityMbps": 1 } },
                "of:1/2": { "bandwidthCapacity": { "capacityMbps": 2 } }
            },
            "apps": {
                "org.onosproject.segmentrouting": {
                    "segmentrouting": { "vRouterId": "of:1" }
                }
            }
        });

        let entries = parse_network_config(&doc).unwrap();
        assert_eq!(entries.len(), 3);

        let ports: Vec<_> = entries
            .iter()
            .filter(|e| e.class == ConfigClass::BANDWIDTH_CAPACITY)
            .map(|e| e.subject.to_string())
            .collect();
        assert_eq!(ports, vec!["of:1/1", "of:1/2"]);
    }

    #[test]
    fn test_rejects_unknown_section() {
        let result = parse_network_config(&json!({"links": {}}));
        assert!(matches!(result, Err(ConfigError::Document(_))));
    }

    #[test]
    fn test_rejects_bad_subject() {
        let result = parse_network_config(&json!({"ports": {"of:1": {}}}));
        assert!(matches!(result, Err(ConfigError::InvalidSubject(_))));
    }
}
