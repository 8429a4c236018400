//! Script generation
//!
//! Drafting a video script is best-effort enrichment: the pipeline
//! never depends on it, and a failed call changes nothing. The
//! generator is an injected capability so the coordination layer (and
//! the tests) never talk to a concrete network client directly.

use serde::{Deserialize, Serialize};

use crate::config::{API_KEY_ENV_VAR, GENERATION_API_BASE, GENERATION_MODEL};
use crate::engine::ProjectKind;
use crate::error::{AppError, Result};

/// Capability for drafting a video script from a project's title and
/// brand/topic.
pub trait ScriptGenerator {
    fn generate(
        &self,
        title: &str,
        brand_name: &str,
        kind: ProjectKind,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Script generator backed by the Gemini generateContent API.
#[derive(Clone)]
pub struct GeminiScriptGenerator {
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiScriptGenerator {
    /// Build a generator with an explicit key, falling back to the
    /// environment. An absent key is not an error until a generation
    /// is actually attempted.
    pub fn new(api_key: Option<String>) -> Self {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok().filter(|k| !k.is_empty()));

        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(None)
    }
}

impl ScriptGenerator for GeminiScriptGenerator {
    async fn generate(&self, title: &str, brand_name: &str, kind: ProjectKind) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(AppError::MissingApiKey)?;

        let url = format!("{GENERATION_API_BASE}/{GENERATION_MODEL}:generateContent?key={api_key}");
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(title, brand_name, kind),
                }],
            }],
        };

        tracing::info!("Requesting script draft for: {}", title);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ScriptGeneration(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AppError::InvalidApiKey);
        }
        if !status.is_success() {
            return Err(AppError::ScriptGeneration(format!(
                "generation API returned {status}"
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::ScriptGeneration(e.to_string()))?;

        let text = body
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(AppError::ScriptGeneration(
                "response contained no script text".to_string(),
            ));
        }

        tracing::debug!("Script draft received ({} chars)", text.len());
        Ok(text)
    }
}

/// The structured scriptwriter prompt: hook, intro, main content, CTA.
fn build_prompt(title: &str, brand_name: &str, kind: ProjectKind) -> String {
    let video_kind = match kind {
        ProjectKind::Sponsored => "sponsored review",
        ProjectKind::Tutorial => "tutorial",
    };

    format!(
        "Act as a professional YouTube scriptwriter.\n\
         Create a structured video script for a {video_kind} video.\n\
         \n\
         Title: {title}\n\
         Brand/Topic: {brand_name}\n\
         \n\
         Structure required:\n\
         1. Hook (0-30s): Grab attention.\n\
         2. Intro: Brief context.\n\
         3. Main Content: Key points (bullet points).\n\
         4. CTA/Outro: Call to action.\n\
         \n\
         Keep it concise and engaging. Return formatted Markdown."
    )
}

/// Fixed-output generator for tests.
#[cfg(test)]
pub struct StubScriptGenerator {
    pub script: String,
}

#[cfg(test)]
impl ScriptGenerator for StubScriptGenerator {
    async fn generate(&self, _title: &str, _brand_name: &str, _kind: ProjectKind) -> Result<String> {
        Ok(self.script.clone())
    }
}

/// Always-failing generator for exercising the best-effort path.
#[cfg(test)]
pub struct FailingScriptGenerator;

#[cfg(test)]
impl ScriptGenerator for FailingScriptGenerator {
    async fn generate(&self, _title: &str, _brand_name: &str, _kind: ProjectKind) -> Result<String> {
        Err(AppError::ScriptGeneration("stubbed outage".to_string()))
    }
}
