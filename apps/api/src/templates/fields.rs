//! Field resolution: which sections of a template need generated text.

use std::collections::HashSet;

use crate::templates::{SectionDescriptor, Template};

/// Returns the first-declared descriptor of every generable section, in template order.
///
/// Duplicate keys are dropped after their first declaration. A template with no
/// sections yields an empty list, which callers must treat as a valid state.
pub fn generable_sections(template: &Template) -> Vec<&SectionDescriptor> {
    let mut seen = HashSet::new();
    template
        .sections
        .iter()
        .filter(|s| s.is_generable())
        .filter(|s| seen.insert(s.key.as_str()))
        .collect()
}

/// Keys of the generable sections of `template`, in declaration order, without duplicates.
pub fn generable_fields(template: &Template) -> Vec<String> {
    generable_sections(template)
        .into_iter()
        .map(|s| s.key.clone())
        .collect()
}

/// Looks up the descriptor that generation for `field_key` should use.
pub fn generable_section<'a>(template: &'a Template, field_key: &str) -> Option<&'a SectionDescriptor> {
    generable_sections(template)
        .into_iter()
        .find(|s| s.key == field_key)
}
