// Shared prompt fragments used by every evaluation arm.
// Arm-specific prompt templates live in evaluation/prompts.rs.

/// Instruction that enforces machine-parseable JSON output.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    OUTPUT FORMAT: Respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Content policy: identity-correlated signals are never matching proxies.
pub const IDENTITY_PROXY_INSTRUCTION: &str = "\
    Use only job-relevant information. \
    Do NOT use names, pronouns, photos, clubs, affiliations, or other identity-correlated \
    signals as proxies for fit. \
    Avoid prestige proxies unless they are directly job-relevant.";
