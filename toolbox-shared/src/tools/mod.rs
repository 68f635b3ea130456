/// Tool catalog and simulators
///
/// The catalog is a fixed list of six tools. Four of them can be run through
/// a [`ToolSimulator`]; the other two are listed and can be favorited but
/// have no generator yet.
///
/// # Simulator contract
///
/// ```text
/// raw input ──validate──> request ──(latency)──> canned output
///              │
///              └─> ToolError::MissingInput (HTTP 400)
/// ```
///
/// Validation is separate from running so callers can record usage between
/// the two steps.

pub mod simulators;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

pub use simulators::{CodeAssistant, ImageGenerator, TextGenerator, Translator};

/// Tool error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ToolError {
    /// A required input field was missing or empty
    #[error("{0}")]
    MissingInput(&'static str),

    /// No tool with this ID in the catalog
    #[error("Tool not found: {0}")]
    NotFound(String),
}

/// One entry in the tool catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tool {
    /// Stable identifier used in URLs and usage records
    pub id: &'static str,

    /// Display name
    pub name: &'static str,

    /// One-line description
    pub description: &'static str,

    /// Category shown as a filter in the UI
    pub category: &'static str,

    /// Emoji icon
    pub icon: &'static str,

    /// Feature bullet points
    pub features: &'static [&'static str],
}

/// The full tool catalog, in display order
pub const CATALOG: &[Tool] = &[
    Tool {
        id: "text-generator",
        name: "Smart Text Generator",
        description: "AI-powered text generation supporting many kinds of writing",
        category: "Text",
        icon: "📝",
        features: &["Article writing", "Title polishing", "Content expansion", "Style editing"],
    },
    Tool {
        id: "image-generator",
        name: "AI Image Generator",
        description: "Generate high-quality images from a text description",
        category: "Image",
        icon: "🎨",
        features: &["Text to image", "Style transfer", "Image enhancement", "Batch generation"],
    },
    Tool {
        id: "code-assistant",
        name: "Code Assistant",
        description: "Smart code generation, optimization and debugging",
        category: "Developer",
        icon: "💻",
        features: &["Code generation", "Bug fixing", "Performance tuning", "Code explanation"],
    },
    Tool {
        id: "translation",
        name: "Smart Translator",
        description: "AI translation across many languages",
        category: "Language",
        icon: "🌐",
        features: &["Multilingual", "Context aware", "Terminology", "Batch translation"],
    },
    Tool {
        id: "content-optimizer",
        name: "Content Optimizer",
        description: "Optimize article content for better SEO",
        category: "Marketing",
        icon: "🚀",
        features: &["SEO tuning", "Keyword analysis", "Readability", "Structure"],
    },
    Tool {
        id: "voice-synthesis",
        name: "Voice Synthesis",
        description: "Turn text into natural-sounding speech",
        category: "Audio",
        icon: "🎤",
        features: &["Multiple voices", "Emotion", "Speed control", "Batch synthesis"],
    },
];

/// Looks up a catalog entry by ID
pub fn find(tool_id: &str) -> Option<&'static Tool> {
    CATALOG.iter().find(|tool| tool.id == tool_id)
}

/// Looks up a catalog entry, failing with `ToolError::NotFound`
pub fn require(tool_id: &str) -> Result<&'static Tool, ToolError> {
    find(tool_id).ok_or_else(|| ToolError::NotFound(tool_id.to_string()))
}

/// Distinct categories in catalog order
pub fn categories() -> Vec<&'static str> {
    let mut seen = Vec::new();
    for tool in CATALOG {
        if !seen.contains(&tool.category) {
            seen.push(tool.category);
        }
    }
    seen
}

/// A stubbed AI generator
///
/// Implementations are pure: `generate` builds canned output from the
/// request. The artificial delay lives in [`ToolSimulator::run`].
#[async_trait]
pub trait ToolSimulator: Send + Sync {
    /// Catalog ID this simulator serves
    const TOOL_ID: &'static str;

    /// Artificial latency before a response
    const LATENCY: Duration;

    /// Raw request body
    type Input: DeserializeOwned + Send;

    /// Validated request
    type Request: Send + Sync;

    /// Response payload
    type Output: Serialize + Send;

    /// Checks required fields and applies defaults
    fn validate(&self, input: Self::Input) -> Result<Self::Request, ToolError>;

    /// Builds the canned response
    fn generate(&self, request: &Self::Request) -> Self::Output;

    /// Waits out the artificial latency, then generates
    async fn run(&self, request: Self::Request, simulate_latency: bool) -> Self::Output {
        if simulate_latency {
            tokio::time::sleep(Self::LATENCY).await;
        }

        tracing::debug!(tool = Self::TOOL_ID, "Simulated tool run");
        self.generate(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_unique() {
        let mut ids: Vec<_> = CATALOG.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), CATALOG.len());
        assert_eq!(CATALOG.len(), 6);
    }

    #[test]
    fn test_find() {
        assert_eq!(find("translation").map(|t| t.icon), Some("🌐"));
        assert!(find("nope").is_none());
        assert_eq!(require("nope"), Err(ToolError::NotFound("nope".to_string())));
    }

    #[test]
    fn test_categories_distinct_in_order() {
        let categories = categories();
        assert_eq!(categories.len(), 6);
        assert_eq!(categories[0], "Text");
        assert_eq!(categories[5], "Audio");
    }

    #[test]
    fn test_simulators_match_catalog() {
        assert!(find(TextGenerator::TOOL_ID).is_some());
        assert!(find(ImageGenerator::TOOL_ID).is_some());
        assert!(find(CodeAssistant::TOOL_ID).is_some());
        assert!(find(Translator::TOOL_ID).is_some());
    }

    #[test]
    fn test_tool_serializes() {
        let json = serde_json::to_value(find("code-assistant").unwrap()).unwrap();
        assert_eq!(json["id"], "code-assistant");
        assert_eq!(json["features"].as_array().unwrap().len(), 4);
    }
}
