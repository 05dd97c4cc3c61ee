// Code extraction from completion responses
//
// Two stages: look for a fenced block tagged with the target language and
// keep its trimmed interior; otherwise fall back to the whole trimmed
// response. The fallback is not an error, but the origin is kept so callers
// and tests can tell the two apart.

use regex::Regex;

/// Fence tag the generation prompt asks for.
pub const CODE_FENCE_LANGUAGE: &str = "hcl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedCode {
    /// Interior of the first fence tagged with the target language.
    Fenced(String),
    /// No matching fence; the whole trimmed response.
    Unfenced(String),
}

impl ExtractedCode {
    pub fn is_fenced(&self) -> bool {
        matches!(self, ExtractedCode::Fenced(_))
    }

    pub fn code(&self) -> &str {
        match self {
            ExtractedCode::Fenced(code) | ExtractedCode::Unfenced(code) => code,
        }
    }

    pub fn into_code(self) -> String {
        match self {
            ExtractedCode::Fenced(code) | ExtractedCode::Unfenced(code) => code,
        }
    }
}

/// Extract the first code block tagged `language` from `response`.
pub fn extract_code_block(response: &str, language: &str) -> ExtractedCode {
    let pattern = format!(r"(?s)```{}\n(.*?)```", regex::escape(language));
    if let Ok(re) = Regex::new(&pattern) {
        if let Some(captures) = re.captures(response) {
            return ExtractedCode::Fenced(captures[1].trim().to_string());
        }
    }
    ExtractedCode::Unfenced(response.trim().to_string())
}
