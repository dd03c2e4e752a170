//! Template schema: named, ordered section layouts for a CV.
//!
//! Templates are loaded from `<templates_dir>/<name>/config.json` and are immutable
//! once loaded. A reload replaces the whole registry.

pub mod fields;
pub mod handlers;
pub mod registry;

use serde::{Deserialize, Serialize};

/// Kind of content a section holds. Only `Blurb` sections are generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Blurb,
    Text,
    List,
    /// Any kind this service does not know about. Never generable.
    #[serde(other)]
    Other,
}

/// A single section of a template, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDescriptor {
    pub key: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    #[serde(default)]
    pub label: String,
    /// Extra guidance passed to the generation prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<u32>,
}

impl SectionDescriptor {
    pub fn is_generable(&self) -> bool {
        self.section_type == SectionType::Blurb
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Taken from the template's directory name, not from `config.json`.
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub sections: Vec<SectionDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_section_type_deserializes_as_other() {
        let json = r#"{"key": "photo", "type": "image", "label": "Photo"}"#;
        let section: SectionDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(section.section_type, SectionType::Other);
        assert!(!section.is_generable());
    }

    #[test]
    fn test_template_without_sections_is_valid() {
        let template: Template = serde_json::from_str(r#"{"description": "bare"}"#).unwrap();
        assert!(template.sections.is_empty());
        assert_eq!(template.description.as_deref(), Some("bare"));
    }

    #[test]
    fn test_section_metadata_is_optional() {
        let json = r#"{
            "key": "summary",
            "type": "blurb",
            "label": "Professional Summary",
            "prompt_context": "A short professional summary",
            "max_chars": 400
        }"#;
        let section: SectionDescriptor = serde_json::from_str(json).unwrap();
        assert!(section.is_generable());
        assert_eq!(section.max_chars, Some(400));

        let bare: SectionDescriptor =
            serde_json::from_str(r#"{"key": "bio", "type": "blurb"}"#).unwrap();
        assert!(bare.label.is_empty());
        assert!(bare.prompt_context.is_none());
    }
}
