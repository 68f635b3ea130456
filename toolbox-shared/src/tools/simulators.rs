/// Canned generators for the runnable tools
///
/// Each returns deterministic text built from its request, except the image
/// generator, whose placeholder URL carries a timestamp.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ToolError, ToolSimulator};

fn non_empty(value: Option<String>, message: &'static str) -> Result<String, ToolError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ToolError::MissingInput(message)),
    }
}

// --- Text ---

/// Text generation request body
#[derive(Debug, Default, Deserialize)]
pub struct TextInput {
    pub prompt: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub length: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TextRequest {
    pub prompt: String,
    pub kind: String,
    pub length: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOutput {
    pub original_prompt: String,
    pub generated_text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub length: String,
    pub word_count: usize,
}

/// Article, title and summary templates
#[derive(Debug, Clone, Copy, Default)]
pub struct TextGenerator;

#[async_trait::async_trait]
impl ToolSimulator for TextGenerator {
    const TOOL_ID: &'static str = "text-generator";
    const LATENCY: Duration = Duration::from_millis(1000);

    type Input = TextInput;
    type Request = TextRequest;
    type Output = TextOutput;

    fn validate(&self, input: TextInput) -> Result<TextRequest, ToolError> {
        Ok(TextRequest {
            prompt: non_empty(input.prompt, "Please provide a prompt")?,
            kind: input.kind.unwrap_or_else(|| "article".to_string()),
            length: input.length.unwrap_or_else(|| "medium".to_string()),
        })
    }

    fn generate(&self, request: &TextRequest) -> TextOutput {
        let prompt = &request.prompt;
        let generated_text = match request.kind.as_str() {
            "title" => format!("{prompt} - an optimized title"),
            "summary" => format!(
                "Summary of \"{prompt}\": a concise overview covering the main points and key information."
            ),
            _ => format!(
                "Here is an article based on your prompt \"{prompt}\":\n\n\
                 Artificial intelligence is advancing quickly and bringing unprecedented convenience to daily life. \
                 From smart assistants to self-driving cars, AI is changing our world.\n\n\
                 In this digital age we need to understand and apply these technologies well to build a better future."
            ),
        };

        TextOutput {
            original_prompt: request.prompt.clone(),
            word_count: generated_text.split(' ').count(),
            generated_text,
            kind: request.kind.clone(),
            length: request.length.clone(),
        }
    }
}

// --- Image ---

/// Image generation request body
#[derive(Debug, Default, Deserialize)]
pub struct ImageInput {
    pub prompt: Option<String>,
    pub style: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub style: String,
    pub size: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOutput {
    pub prompt: String,
    pub image_url: String,
    pub style: String,
    pub size: String,
    pub generated_at: String,
}

/// Returns a placeholder image URL sized from the request
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageGenerator;

#[async_trait::async_trait]
impl ToolSimulator for ImageGenerator {
    const TOOL_ID: &'static str = "image-generator";
    const LATENCY: Duration = Duration::from_millis(2000);

    type Input = ImageInput;
    type Request = ImageRequest;
    type Output = ImageOutput;

    fn validate(&self, input: ImageInput) -> Result<ImageRequest, ToolError> {
        Ok(ImageRequest {
            prompt: non_empty(input.prompt, "Please provide an image description")?,
            style: input.style.unwrap_or_else(|| "realistic".to_string()),
            size: input.size.unwrap_or_else(|| "512x512".to_string()),
        })
    }

    fn generate(&self, request: &ImageRequest) -> ImageOutput {
        let now = Utc::now();
        let (width, height) = request.size.split_once('x').unwrap_or((request.size.as_str(), ""));

        ImageOutput {
            prompt: request.prompt.clone(),
            image_url: format!(
                "https://picsum.photos/{}/{}?random={}",
                width,
                height,
                now.timestamp_millis()
            ),
            style: request.style.clone(),
            size: request.size.clone(),
            generated_at: now.to_rfc3339(),
        }
    }
}

// --- Code ---

/// Code generation request body
#[derive(Debug, Default, Deserialize)]
pub struct CodeInput {
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CodeRequest {
    pub description: String,
    pub language: String,
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct CodeOutput {
    pub description: String,
    pub code: String,
    pub language: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub explanation: String,
}

/// JavaScript function and class templates, with a generic fallback
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeAssistant;

#[async_trait::async_trait]
impl ToolSimulator for CodeAssistant {
    const TOOL_ID: &'static str = "code-assistant";
    const LATENCY: Duration = Duration::from_millis(1500);

    type Input = CodeInput;
    type Request = CodeRequest;
    type Output = CodeOutput;

    fn validate(&self, input: CodeInput) -> Result<CodeRequest, ToolError> {
        Ok(CodeRequest {
            description: non_empty(input.description, "Please provide a code description")?,
            language: input.language.unwrap_or_else(|| "javascript".to_string()),
            kind: input.kind.unwrap_or_else(|| "function".to_string()),
        })
    }

    fn generate(&self, request: &CodeRequest) -> CodeOutput {
        let description = &request.description;
        let code = match (request.language.as_str(), request.kind.as_str()) {
            ("javascript", "function") => format!(
                "// {description}\nfunction generatedFunction() {{\n  // implementation\n  console.log('Hello, AI generated code!');\n  return true;\n}}"
            ),
            ("javascript", "class") => format!(
                "// {description}\nclass GeneratedClass {{\n  constructor() {{\n    this.initialized = true;\n  }}\n  \n  method() {{\n    return 'AI generated method';\n  }}\n}}"
            ),
            _ => format!("// {description}\nconsole.log('Generated code');"),
        };

        CodeOutput {
            description: description.clone(),
            code,
            language: request.language.clone(),
            kind: request.kind.clone(),
            explanation: format!(
                "This code implements {} and is written in {}.",
                description, request.language
            ),
        }
    }
}

// --- Translation ---

/// Translation request body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationInput {
    pub text: Option<String>,
    pub from_lang: Option<String>,
    pub to_lang: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub text: String,
    pub from_lang: String,
    pub to_lang: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationOutput {
    pub original_text: String,
    pub translated_text: String,
    pub from_language: String,
    pub to_language: String,
    pub confidence: f64,
}

const DETECTED_LANGUAGE: &str = "en";
const CONFIDENCE: f64 = 0.95;

/// Word-by-word dictionary lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator;

impl Translator {
    fn translate_word(word: &str) -> String {
        match word {
            "hello" => "你好".to_string(),
            "world" => "世界".to_string(),
            "ai" => "人工智能".to_string(),
            other => format!("[translation of {other}]"),
        }
    }
}

#[async_trait::async_trait]
impl ToolSimulator for Translator {
    const TOOL_ID: &'static str = "translation";
    const LATENCY: Duration = Duration::from_millis(800);

    type Input = TranslationInput;
    type Request = TranslationRequest;
    type Output = TranslationOutput;

    fn validate(&self, input: TranslationInput) -> Result<TranslationRequest, ToolError> {
        Ok(TranslationRequest {
            text: non_empty(input.text, "Please provide text to translate")?,
            from_lang: input.from_lang.unwrap_or_else(|| "auto".to_string()),
            to_lang: input.to_lang.unwrap_or_else(|| "zh".to_string()),
        })
    }

    fn generate(&self, request: &TranslationRequest) -> TranslationOutput {
        let translated_text = request
            .text
            .to_lowercase()
            .split(' ')
            .map(Self::translate_word)
            .collect::<Vec<_>>()
            .join(" ");

        TranslationOutput {
            original_text: request.text.clone(),
            translated_text,
            // Detection always reports English
            from_language: DETECTED_LANGUAGE.to_string(),
            to_language: request.to_lang.clone(),
            confidence: CONFIDENCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_requires_prompt() {
        assert_eq!(
            TextGenerator.validate(TextInput::default()).unwrap_err(),
            ToolError::MissingInput("Please provide a prompt")
        );

        let empty = TextInput {
            prompt: Some(String::new()),
            ..Default::default()
        };
        assert!(TextGenerator.validate(empty).is_err());
    }

    #[test]
    fn test_text_defaults_and_templates() {
        let request = TextGenerator
            .validate(TextInput {
                prompt: Some("rust".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(request.kind, "article");
        assert_eq!(request.length, "medium");

        let output = TextGenerator.generate(&request);
        assert!(output.generated_text.contains("\"rust\""));
        assert_eq!(output.word_count, output.generated_text.split(' ').count());

        let title = TextGenerator.generate(&TextRequest {
            kind: "title".to_string(),
            ..request
        });
        assert_eq!(title.generated_text, "rust - an optimized title");
    }

    #[test]
    fn test_image_url_uses_size() {
        let request = ImageGenerator
            .validate(ImageInput {
                prompt: Some("a cat".to_string()),
                size: Some("256x128".to_string()),
                ..Default::default()
            })
            .unwrap();
        let output = ImageGenerator.generate(&request);

        assert_eq!(output.style, "realistic");
        assert!(output.image_url.starts_with("https://picsum.photos/256/128?random="));
    }

    #[test]
    fn test_code_templates() {
        let request = CodeAssistant
            .validate(CodeInput {
                description: Some("add numbers".to_string()),
                ..Default::default()
            })
            .unwrap();
        let output = CodeAssistant.generate(&request);
        assert!(output.code.starts_with("// add numbers\nfunction generatedFunction()"));

        let python = CodeAssistant.generate(&CodeRequest {
            language: "python".to_string(),
            ..request
        });
        assert_eq!(python.code, "// add numbers\nconsole.log('Generated code');");
    }

    #[test]
    fn test_translation_dictionary() {
        let request = Translator
            .validate(TranslationInput {
                text: Some("Hello big World".to_string()),
                ..Default::default()
            })
            .unwrap();
        let output = Translator.generate(&request);

        assert_eq!(output.translated_text, "你好 [translation of big] 世界");
        assert_eq!(output.from_language, "en");
        assert_eq!(output.to_language, "zh");
    }

    #[test]
    fn test_translation_input_camel_case() {
        let input: TranslationInput =
            serde_json::from_str(r#"{"text":"ai","toLang":"fr"}"#).unwrap();
        assert_eq!(input.to_lang.as_deref(), Some("fr"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_waits_for_latency() {
        let request = Translator
            .validate(TranslationInput {
                text: Some("ai".to_string()),
                ..Default::default()
            })
            .unwrap();

        let started = tokio::time::Instant::now();
        let output = Translator.run(request.clone(), true).await;
        assert!(started.elapsed() >= Translator::LATENCY);
        assert_eq!(output.translated_text, "人工智能");

        let started = tokio::time::Instant::now();
        Translator.run(request, false).await;
        assert!(started.elapsed() < Translator::LATENCY);
    }
}
