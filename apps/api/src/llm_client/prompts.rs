// Prompt text for CV translation.

pub const TRANSLATION_SYSTEM: &str = "You are a professional CV translator. \
    Respond with the translated CV only. \
    Do NOT add commentary, explanations or markdown code fences.";

/// Placeholders: `{source_language}`, `{target_language}`, `{cv_text}`.
pub const TRANSLATION_PROMPT: &str = "\
Translate the following CV from {source_language} to {target_language}.
Maintain the professional CV format, structure, and section headers.

Rules for translation:
1. Preserve all formatting characters like **, --, and bullet points (- or •)
2. Keep section titles clearly marked (with ** or similar formatting)
3. Ensure job titles, skills, and educational qualifications are accurately translated
4. Maintain the same number of bullet points and similar length for each point
5. Preserve formatting of dates, locations, and company names
6. Do not add or remove information, just translate it accurately

CV to translate:
{cv_text}";

/// Fills the translation prompt with display language names and the CV body.
pub fn build_translation_prompt(source_language: &str, target_language: &str, cv_text: &str) -> String {
    TRANSLATION_PROMPT
        .replace("{source_language}", source_language)
        .replace("{target_language}", target_language)
        .replace("{cv_text}", cv_text)
}
