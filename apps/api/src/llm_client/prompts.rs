// Cross-cutting prompt fragments shared by every LLM-backed service.
// Each service keeps its own prompts.rs next to it for the rest.

/// Appended to every generation prompt.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Use only facts present in the candidate record below. \
    Do NOT invent employers, titles, dates, metrics, or skills. \
    If the record does not support a claim, leave it out.";
