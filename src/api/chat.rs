//! Chat completion adapter
//!
//! The full transcript goes out verbatim on every turn; only the first
//! choice of the response is used.

use super::Complete;
use crate::session::{ChatMessage, ChatModel};
use crate::{ParleyError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Generates replies via the remote chat completion API
pub struct ChatClient {
    client: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Complete for ChatClient {
    fn complete(&self, api_key: &str, model: ChatModel, messages: &[ChatMessage]) -> Result<String> {
        if api_key.is_empty() {
            return Err(ParleyError::Config("OpenAI API key is not set".into()));
        }

        debug!(
            model = model.id(),
            history = messages.len(),
            "requesting completion"
        );

        let request = CompletionRequest {
            model: model.id(),
            messages,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .map_err(|e| {
                error!(error = %e, "completion request failed");
                ParleyError::Completion(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            error!(status = %status, body = %body, "completion API error");
            return Err(ParleyError::Completion(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let result: CompletionResponse = response
            .json()
            .map_err(|e| ParleyError::Completion(format!("Malformed response: {}", e)))?;

        let reply = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ParleyError::Completion("Response contained no choices".into()))?;

        info!(chars = reply.len(), "completion received");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ChatMessage;

    #[test]
    fn test_request_wire_shape() {
        let messages = vec![
            ChatMessage::system("seed"),
            ChatMessage::user("hello"),
        ];
        let request = CompletionRequest {
            model: ChatModel::Gpt4.id(),
            messages: &messages,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "hello");
    }

    #[test]
    fn test_first_choice_extracted() {
        let body = r#"{"choices":[{"message":{"content":"hi there"}},{"message":{"content":"ignored"}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(body).unwrap();
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap();
        assert_eq!(reply, "hi there");
    }

    #[test]
    fn test_empty_choices_is_an_error() {
        let parsed: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn test_empty_key_rejected() {
        let chat = ChatClient::new("http://localhost:0/none");
        let err = chat.complete("", ChatModel::Gpt4, &[]).unwrap_err();
        assert!(matches!(err, ParleyError::Config(_)));
    }
}
