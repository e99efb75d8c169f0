//! Content-analysis capability used for authorship estimates and
//! certificate review. Only the prompt/response contract lives here; the
//! transport is behind [`ContentAnalyzer`].

pub mod http;

use crate::error::{PodTrustError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Longest slice of file content sent for analysis.
pub const MAX_PROMPT_CONTENT_CHARS: usize = 12_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImageAttachment {
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PodTrustError::PathNotFound(path.display().to_string()));
        }
        let extension = path
            .extension()
            .and_then(|value| value.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let mime_type = match extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "pdf" => "application/pdf",
            other => {
                return Err(PodTrustError::Validation(format!(
                    "unsupported certificate file type: .{other}"
                )))
            }
        };
        Ok(Self {
            mime_type: mime_type.to_string(),
            data: std::fs::read(path)?,
        })
    }
}

#[async_trait]
pub trait ContentAnalyzer: Send + Sync {
    /// Sends `prompt` (and optionally an image) and returns the raw text answer.
    async fn analyze(&self, prompt: &str, image: Option<&ImageAttachment>) -> Result<String>;
}

pub fn contribution_prompt(content: &str, description: Option<&str>, file_type: Option<&str>) -> String {
    let excerpt = content
        .chars()
        .take(MAX_PROMPT_CONTENT_CHARS)
        .collect::<String>();
    let mut prompt = String::from(
        "You are reviewing a file uploaded to a student project team. Estimate how much of it \
was produced by an AI assistant versus written by a human.\n\n\
Indicators of AI authorship:\n\
- uniform structure and formatting with no rough edges\n\
- exhaustive, textbook-style comments on obvious lines\n\
- generic identifiers and boilerplate error handling everywhere\n\
- no traces of iteration (no TODOs, dead code, debugging leftovers)\n\n\
Indicators of human authorship:\n\
- inconsistent style, abbreviations and personal naming habits\n\
- terse or informal comments, commented-out experiments, TODO notes\n\
- project-specific shortcuts and uneven error handling\n\
- signs of incremental edits and fixes\n\n",
    );
    if let Some(file_type) = file_type.filter(|value| !value.trim().is_empty()) {
        prompt.push_str(&format!("File type: {}\n", file_type.trim()));
    }
    if let Some(description) = description.filter(|value| !value.trim().is_empty()) {
        prompt.push_str(&format!("Uploader's description: {}\n", description.trim()));
    }
    prompt.push_str(&format!("\nFile content:\n```\n{excerpt}\n```\n\n"));
    prompt.push_str(
        "Respond with JSON only, in this shape:\n\
{\"ai_contribution_percent\": <0-100>, \"human_contribution_percent\": <0-100>, \
\"reasoning\": \"<one or two sentences>\", \"confidence\": \"low|medium|high\"}\n\
The two percentages must add up to 100.",
    );
    prompt
}

pub fn certificate_prompt(requested_skills: &[String]) -> String {
    format!(
        "You are verifying a course or professional certificate image. Decide whether it is a \
genuine, completed certificate, and list the technical skills it demonstrates.\n\n\
The holder wants these skills verified: {}\n\n\
Respond with JSON only, in this shape:\n\
{{\"isValid\": true|false, \"skills\": [\"<skill>\", ...], \"certificateName\": \"<title>\", \
\"issuingOrganization\": \"<issuer>\", \"message\": \"<short explanation for the holder>\"}}\n\
Only list skills the certificate clearly covers.",
        requested_skills.join(", ")
    )
}

/// Pulls the JSON object out of a free-text answer, tolerating code fences
/// and surrounding prose.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    let start = text.find('{');
    let end = text.rfind('}');
    let payload = match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => {
            return Err(PodTrustError::Capability(
                "analysis response contained no JSON object".to_string(),
            ))
        }
    };
    serde_json::from_str(payload)
        .map_err(|e| PodTrustError::Capability(format!("malformed analysis response: {e}")))
}
