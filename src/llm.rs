use anyhow::Result;

/// Models tried in order when requesting a false-start fragment. The first
/// non-empty response wins.
pub const DEFAULT_MODELS: &[&str] = &["llama3.2:3b", "phi3"];

/// Per-model request timeout. Generator slowness must never stall a run for
/// longer than this.
pub const FRAGMENT_TIMEOUT_SECS: u64 = 15;

const FRAGMENT_TEMPERATURE: f32 = 0.9;
const FRAGMENT_MAX_TOKENS: u32 = 35;

/// Prompt for a sentence fragment a writer might start typing and then
/// delete. The context excerpt keeps the fragment stylistically plausible.
pub fn build_fragment_prompt(context: &str) -> String {
    format!(
        "Given this writing context, write 1 sentence fragment (8-20 words) \
         that someone might START typing but then delete and rephrase. \
         Match the writing style. Output only the fragment, nothing else.\n\n\
         Context: {context}"
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl FragmentRequest {
    pub fn new(context: &str, model: &str) -> Self {
        Self {
            prompt: build_fragment_prompt(context),
            model: model.to_string(),
            temperature: FRAGMENT_TEMPERATURE,
            max_tokens: FRAGMENT_MAX_TOKENS,
        }
    }
}

/// External text generator consumed by the false-start engine. Synchronous
/// from the engine's viewpoint; implementations bound their own latency.
pub trait FragmentGenerator {
    fn generate(&mut self, request: &FragmentRequest) -> Result<String>;
}

/// Reduce a raw model response to a single usable fragment: first line only,
/// surrounding quotes stripped. Returns `None` when nothing usable remains.
pub fn sanitize_fragment(raw: &str) -> Option<String> {
    let line = raw.trim().lines().next()?.trim();
    let line = line.trim_matches(|c: char| c == '"' || c == '\'').trim();
    if line.is_empty() {
        return None;
    }
    Some(line.to_string())
}

/// Try each model in order and return the first usable fragment. Generator
/// failures and timeouts are absorbed here; they never fail the run.
pub fn request_fragment(generator: &mut dyn FragmentGenerator, context: &str) -> Option<String> {
    for model in DEFAULT_MODELS {
        let request = FragmentRequest::new(context, model);
        match generator.generate(&request) {
            Ok(raw) => {
                if let Some(fragment) = sanitize_fragment(&raw) {
                    return Some(fragment);
                }
            }
            Err(err) => {
                log::debug!("fragment request failed for model {model}: {err:#}");
            }
        }
    }
    None
}

/// What the connectivity probe learned about the local generator service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    pub model_count: usize,
}

#[cfg(feature = "llm")]
pub mod ollama {
    use super::*;

    use std::time::Duration;

    use anyhow::{anyhow, Context, Result};
    use async_openai::{
        config::OpenAIConfig,
        types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
        Client,
    };
    use tokio::runtime::Runtime;
    use tokio::time::timeout;

    const OLLAMA_BASE_URL_ENV: &str = "OLLAMA_BASE_URL";
    const DEFAULT_API_BASE: &str = "http://localhost:11434/v1";

    /// Fragment generator backed by a local Ollama server through its
    /// OpenAI-compatible endpoint.
    pub struct OllamaFragmentClient {
        client: Client<OpenAIConfig>,
        runtime: Runtime,
    }

    impl OllamaFragmentClient {
        pub fn from_env() -> Result<Self> {
            dotenvy::dotenv().ok();
            let api_base =
                std::env::var(OLLAMA_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

            // Ollama ignores the API key but the client requires one.
            let config = OpenAIConfig::new()
                .with_api_key("ollama")
                .with_api_base(api_base);

            let runtime = Runtime::new().context("failed to start tokio runtime")?;

            Ok(Self {
                client: Client::with_config(config),
                runtime,
            })
        }

        /// On-demand reachability check: reports the number of installed
        /// models. Purely informational; never called during a run.
        pub fn probe(&self) -> Result<ProbeReport> {
            let models = self.runtime.block_on(async {
                timeout(Duration::from_secs(3), self.client.models().list())
                    .await
                    .map_err(|_| anyhow!("model listing timed out"))?
                    .context("model listing request failed")
            })?;

            Ok(ProbeReport {
                model_count: models.data.len(),
            })
        }
    }

    impl FragmentGenerator for OllamaFragmentClient {
        fn generate(&mut self, request: &FragmentRequest) -> Result<String> {
            let chat_request = CreateChatCompletionRequestArgs::default()
                .model(request.model.as_str())
                .messages([ChatCompletionRequestUserMessageArgs::default()
                    .content(request.prompt.as_str())
                    .build()?
                    .into()])
                .temperature(request.temperature)
                .max_completion_tokens(request.max_tokens)
                .build()
                .context("failed to build fragment request")?;

            let response = self.runtime.block_on(async {
                timeout(
                    Duration::from_secs(FRAGMENT_TIMEOUT_SECS),
                    self.client.chat().create(chat_request),
                )
                .await
                .map_err(|_| anyhow!("fragment request timed out"))?
                .context("fragment request failed")
            })?;

            response
                .choices
                .first()
                .and_then(|c| c.message.content.clone())
                .ok_or_else(|| anyhow!("missing choices[0].message.content"))
        }
    }
}

#[cfg(not(feature = "llm"))]
pub mod ollama {
    use super::*;

    use anyhow::{anyhow, Result};

    pub struct OllamaFragmentClient;

    impl OllamaFragmentClient {
        pub fn from_env() -> Result<Self> {
            Err(anyhow!(
                "LLM support is disabled (build with --features llm)"
            ))
        }

        pub fn probe(&self) -> Result<ProbeReport> {
            Err(anyhow!(
                "LLM support is disabled (build with --features llm)"
            ))
        }
    }

    impl FragmentGenerator for OllamaFragmentClient {
        fn generate(&mut self, _request: &FragmentRequest) -> Result<String> {
            Err(anyhow!(
                "LLM support is disabled (build with --features llm)"
            ))
        }
    }
}
