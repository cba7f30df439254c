/*!
 * Prompt templates for the translation pipeline.
 *
 * Builds the fixed system prompt, the per-unit translation query and the
 * corrective exchange injected into the conversation when a model breaks
 * the required JSON response format.
 */

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Corrective user turn appended after a malformed or non-conforming response
pub const CORRECTIVE_USER: &str = "No, you should follow the JSON format of \
{\"source_lang\": \"EN\", \"translated_text\": \"Translated text\"}";

/// Acknowledging assistant turn paired with [`CORRECTIVE_USER`]
pub const CORRECTIVE_ASSISTANT: &str = "Got it. I will follow the JSON format of \
{\"source_lang\": \"EN\", \"translated_text\": \"Translated text\"}";

/// Build the default system prompt for a target language
pub fn default_system_prompt(target_language: &str) -> String {
    format!(
        "You are an advanced translation assistant. Follow these rules:\n\
         1. Translate the input text to {target_language} while maintaining context.\n\
         2. Determine formal/informal tone based on speaker relationships.\n\
         3. Always respond in JSON format: {{\"source_lang\": \"EN\", \"translated_text\": \"<translated_text>\"}}.\n\
         4. No explanations, only valid JSON.\n\
         5. NEVER include any additional fields in the JSON response.\n\
         6. NEVER include any comments or explanations outside the JSON."
    )
}

/// Resolve the system prompt for a run: a prompt file override when given,
/// otherwise the default, with an optional free-text addendum appended.
pub fn build_system_prompt(
    target_language: &str,
    system_prompt_file: Option<&Path>,
    additional_prompt: Option<&str>,
) -> Result<String> {
    let mut prompt = match system_prompt_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read system prompt file: {}", path.display()))?
            .trim()
            .to_string(),
        None => default_system_prompt(target_language),
    };

    if let Some(additional) = additional_prompt {
        if !additional.trim().is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(additional.trim());
        }
    }

    Ok(prompt)
}

/// Build the per-unit translation query
pub fn translate_query(
    target_language: &str,
    additional_prompt: Option<&str>,
    text: &str,
) -> String {
    let additional = additional_prompt.unwrap_or_default();
    format!(
        "Translate the following sentence to {target_language}.\n\
         Make sure your response should follow the JSON format of:\n\
         {{\"source_lang\": \"EN\", \"translated_text\": \"Translated text\"}}\n\
         \n\
         {additional}\n\
         \n\
         Original:\n\
         {text}\n\
         \n\
         MAKE SURE TO FOLLOW THE JSON FORMAT."
    )
}
