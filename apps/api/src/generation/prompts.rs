// LLM prompt constants for blurb generation.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for blurb generation. Enforces JSON-only output.
pub const BLURB_SYSTEM: &str = "You are a professional CV writer. \
    Generate polished, concise CV text. \
    Each suggestion must be a complete, self-contained statement suitable for a CV. \
    You MUST respond with valid JSON only: an object with a single key \"suggestions\" \
    holding an array of strings. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Blurb generation prompt template.
/// Replace: {count}, {field_label}, {field_key}, {field_guidance},
///          {grounding_instruction}, {candidate}, {experiences}, {projects}, {job_focus}
pub const BLURB_PROMPT_TEMPLATE: &str = r#"Generate {count} CV blurb suggestions for the field "{field_label}" (key: {field_key}).
{field_guidance}
{grounding_instruction}

## Candidate
{candidate}

## Experiences
{experiences}

## Projects
{projects}
{job_focus}
Return a JSON object with exactly {count} suggestions:
{"suggestions": ["first blurb", "second blurb"]}"#;
