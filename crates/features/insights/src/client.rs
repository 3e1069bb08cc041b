//! The two inference dialects this slice speaks.

use brigade_connect::{ConnectError, RestClient};
use serde::Deserialize;
use serde_json::json;

/// OpenAI-style chat completions (OpenRouter).
#[derive(Debug, Clone)]
pub struct ChatClient {
    pub client: RestClient,
    pub model: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl ChatClient {
    /// Sends one user message and returns the first choice's content.
    ///
    /// # Errors
    /// [`ConnectError`] on transport, status or shape failures.
    pub async fn complete(&self, prompt: &str) -> Result<String, ConnectError> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response: ChatResponse = self.client.post_json("/chat/completions", &body).await?;
        response.choices.into_iter().next().map(|c| c.message.content).ok_or_else(|| {
            ConnectError::Decode {
                service: self.client.service().to_owned(),
                message: "response carried no choices".to_owned(),
            }
        })
    }
}

/// HuggingFace text-generation inference.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    pub client: RestClient,
    pub model: String,
}

#[derive(Debug, Deserialize)]
struct Generated {
    generated_text: String,
}

impl InferenceClient {
    /// Runs the prompt through the configured model.
    ///
    /// # Errors
    /// [`ConnectError`] on transport, status or shape failures.
    pub async fn complete(&self, prompt: &str) -> Result<String, ConnectError> {
        let body = json!({ "inputs": prompt });

        let response: Vec<Generated> =
            self.client.post_json(&format!("/models/{}", self.model), &body).await?;
        response.into_iter().next().map(|g| g.generated_text).ok_or_else(|| {
            ConnectError::Decode {
                service: self.client.service().to_owned(),
                message: "response carried no generations".to_owned(),
            }
        })
    }
}
