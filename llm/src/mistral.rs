use crate::error::LlmError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const DEFAULT_MISTRAL_ENDPOINT: &str = "https://api.mistral.ai";

/// Mistral's embedding model.
pub const MISTRAL_EMBED: &str = "mistral-embed";
const MISTRAL_EMBED_SIZE: usize = 1024;

/// Default model for chat completions.
pub const MISTRAL_LARGE_LATEST: &str = "mistral-large-latest";

/// Maximum amount of inputs sent in a single embedding request.
const EMBED_BATCH_SIZE: usize = 32;

pub struct MistralClient {
    endpoint: String,
    key: String,
    client: reqwest::Client,
}

impl MistralClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            endpoint: DEFAULT_MISTRAL_ENDPOINT.to_string(),
            key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client to a different, API compatible, endpoint.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn list_embedding_models(&self) -> Vec<(String, usize)> {
        vec![(String::from(MISTRAL_EMBED), MISTRAL_EMBED_SIZE)]
    }

    /// Embed `input` with `model`. Inputs are sent in batches of 32 and the
    /// returned vectors are in the same order as the inputs.
    pub async fn embed(&self, input: &[&str], model: &str) -> Result<Vec<Vec<f32>>, LlmError> {
        if input.is_empty() {
            return Err(LlmError::InvalidInput(format!(
                "cannot be empty (len = {})",
                input.len()
            )));
        }

        let mut embeddings = Vec::with_capacity(input.len());

        for batch in input.chunks(EMBED_BATCH_SIZE) {
            let request = EmbeddingRequest {
                model: model.to_string(),
                input: batch.iter().map(|s| s.to_string()).collect(),
            };

            let response: EmbeddingResponse = self.post("v1/embeddings", &request).await?;

            if let Some(usage) = &response.usage {
                debug!(
                    "Embedded {} chunk(s) with '{}', used tokens {}-{} (prompt-total)",
                    batch.len(),
                    response.model,
                    usage.prompt_tokens,
                    usage.total_tokens
                );
            }

            embeddings.extend(ordered_embeddings(batch.len(), response.data)?);
        }

        Ok(embeddings)
    }

    /// Send a chat completion request and return the first choice.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatCompletion, LlmError> {
        let response: ChatResponse = self.post("v1/chat/completions", request).await?;

        let ChatResponse {
            model,
            choices,
            usage,
            ..
        } = response;

        let Some(choice) = choices.into_iter().next() else {
            return Err(LlmError::EmptyResponse(format!(
                "no choices in completion from '{model}'"
            )));
        };

        if let Some(usage) = &usage {
            debug!(
                "Completion from '{model}', finish reason {:?}, used tokens {}-{} (prompt-total)",
                choice.finish_reason, usage.prompt_tokens, usage.total_tokens
            );
        }

        Ok(ChatCompletion {
            content: choice.message.content.unwrap_or_default(),
            model,
            usage,
        })
    }

    async fn post<Req, Res>(&self, path: &str, body: &Req) -> Result<Res, LlmError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let url = format!("{}/{path}", self.endpoint);

        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.key)
            .json(body)
            .send()
            .await
        {
            Ok(res) => res,
            Err(e) => {
                tracing::error!("Error in Mistral request: {e}");
                return Err(LlmError::Reqwest(e));
            }
        };

        let status = response.status();

        if !status.is_success() {
            tracing::error!("Request to {url} failed with status {status}");
            let body = response.text().await.unwrap_or_default();
            let error = MistralError::from_body(status.as_u16(), &body);
            tracing::error!("Response: {error:?}");
            return Err(LlmError::Mistral(error));
        }

        match response.json::<Res>().await {
            Ok(res) => Ok(res),
            Err(e) => {
                tracing::error!("Error decoding Mistral response: {e}");
                Err(LlmError::Reqwest(e))
            }
        }
    }
}

/// Restore the input order of a batch's embeddings.
/// Errors unless there is exactly one embedding per input.
fn ordered_embeddings(
    expected: usize,
    mut data: Vec<EmbeddingObject>,
) -> Result<Vec<Vec<f32>>, LlmError> {
    if data.len() != expected {
        return Err(LlmError::EmptyResponse(format!(
            "expected {expected} embeddings, got {}",
            data.len()
        )));
    }

    data.sort_by_key(|obj| obj.index);

    if data.iter().enumerate().any(|(i, obj)| obj.index != i) {
        return Err(LlmError::EmptyResponse(format!(
            "embedding indexes are not 0..{expected}"
        )));
    }

    Ok(data.into_iter().map(|obj| obj.embedding).collect())
}

impl std::fmt::Debug for MistralClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MistralClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// A request consisting of a single user message.
    pub fn user(model: &str, prompt: &str, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: ChatRole::User,
                content: prompt.to_string(),
            }],
            temperature,
            max_tokens,
        }
    }
}

/// The first choice of a chat completion.
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    pub content: String,
    pub model: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingObject>,
    model: String,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingObject {
    embedding: Vec<f32>,
    index: usize,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct ChatResponse {
    id: String,
    model: String,
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Error)]
#[error("Mistral error response ({status}): {message}")]
pub struct MistralError {
    pub status: u16,
    pub message: String,
    pub r#type: Option<String>,
}

impl MistralError {
    /// Build the error from a response body. Mistral returns either
    /// `{ "message": .., "type": .. }` or `{ "detail": .. }` for validation errors,
    /// anything else is kept verbatim.
    fn from_body(status: u16, body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
            return Self {
                status,
                message: body.to_string(),
                r#type: None,
            };
        };

        let message = match (value.get("message"), value.get("detail")) {
            (Some(serde_json::Value::String(message)), _) => message.clone(),
            (Some(message), _) => message.to_string(),
            (None, Some(detail)) => detail.to_string(),
            (None, None) => body.to_string(),
        };

        let r#type = value
            .get("type")
            .and_then(|ty| ty.as_str())
            .map(String::from);

        Self {
            status,
            message,
            r#type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_message_body() {
        let body = r#"{"object":"error","message":"Unauthorized","type":"invalid_request_error","param":null,"code":null}"#;
        let error = MistralError::from_body(401, body);
        assert_eq!(401, error.status);
        assert_eq!("Unauthorized", error.message);
        assert_eq!(Some("invalid_request_error"), error.r#type.as_deref());
    }

    #[test]
    fn error_from_detail_body() {
        let body = r#"{"detail":[{"loc":["body","model"],"msg":"field required"}]}"#;
        let error = MistralError::from_body(422, body);
        assert!(error.message.contains("field required"));
        assert!(error.r#type.is_none());
    }

    #[test]
    fn error_from_plain_body() {
        let error = MistralError::from_body(502, "Bad Gateway");
        assert_eq!("Bad Gateway", error.message);
    }

    #[test]
    fn chat_request_wire_format() {
        let request = ChatRequest::user(MISTRAL_LARGE_LATEST, "Hello?", 0.1, 1000);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!("mistral-large-latest", value["model"]);
        assert_eq!("user", value["messages"][0]["role"]);
        assert_eq!("Hello?", value["messages"][0]["content"]);
        assert_eq!(1000, value["max_tokens"]);
    }

    #[test]
    fn chat_response_decodes() {
        let body = r#"{
            "id": "cmpl-1",
            "object": "chat.completion",
            "model": "mistral-large-latest",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "According to Source 1, yes."}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 7, "total_tokens": 17}
        }"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(1, response.choices.len());
        assert_eq!(
            Some("According to Source 1, yes."),
            response.choices[0].message.content.as_deref()
        );
        assert_eq!(17, response.usage.unwrap().total_tokens);
    }

    #[test]
    fn endpoint_trailing_slash() {
        let client = MistralClient::new("key").with_endpoint("http://localhost:8080/");
        assert_eq!("http://localhost:8080", client.endpoint());
    }

    fn object(index: usize, value: f32) -> EmbeddingObject {
        EmbeddingObject {
            embedding: vec![value],
            index,
        }
    }

    #[test]
    fn embeddings_follow_input_order() {
        let data = vec![object(2, 2.0), object(0, 0.0), object(1, 1.0)];
        let embeddings = ordered_embeddings(3, data).unwrap();
        assert_eq!(vec![vec![0.0], vec![1.0], vec![2.0]], embeddings);
    }

    #[test]
    fn embeddings_must_match_inputs() {
        let error = ordered_embeddings(2, vec![object(0, 0.0)]).unwrap_err();
        assert!(matches!(error, LlmError::EmptyResponse(_)));

        let error = ordered_embeddings(2, vec![object(0, 0.0), object(0, 1.0)]).unwrap_err();
        assert!(matches!(error, LlmError::EmptyResponse(_)));
    }

    mod server {
        use super::super::*;
        use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
        use serde_json::{json, Value};
        use std::sync::{Arc, Mutex};

        /// Serve `router` on a random local port and return its address.
        async fn serve(router: Router) -> String {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
            format!("http://{addr}")
        }

        /// Embeds every input as its parsed number and answers in reverse order.
        async fn embeddings(
            State(batches): State<Arc<Mutex<Vec<usize>>>>,
            Json(request): Json<Value>,
        ) -> Json<Value> {
            let input = request["input"].as_array().unwrap();
            batches.lock().unwrap().push(input.len());

            let data = input
                .iter()
                .enumerate()
                .rev()
                .map(|(index, value)| {
                    let value = value.as_str().unwrap().parse::<f32>().unwrap();
                    json!({ "object": "embedding", "embedding": [value], "index": index })
                })
                .collect::<Vec<_>>();

            Json(json!({
                "id": "embd-1",
                "object": "list",
                "model": MISTRAL_EMBED,
                "data": data,
                "usage": { "prompt_tokens": input.len(), "total_tokens": input.len() }
            }))
        }

        #[tokio::test]
        async fn embed_batches_and_orders() {
            let batches = Arc::new(Mutex::new(vec![]));
            let router = Router::new()
                .route("/v1/embeddings", post(embeddings))
                .with_state(batches.clone());

            let client = MistralClient::new("key").with_endpoint(&serve(router).await);

            let input = (0..33).map(|i| i.to_string()).collect::<Vec<_>>();
            let input = input.iter().map(String::as_str).collect::<Vec<_>>();

            let embeddings = client.embed(&input, MISTRAL_EMBED).await.unwrap();

            assert_eq!(vec![32, 1], *batches.lock().unwrap());
            assert_eq!(33, embeddings.len());
            for (i, embedding) in embeddings.iter().enumerate() {
                assert_eq!(vec![i as f32], *embedding);
            }
        }

        #[tokio::test]
        async fn embed_surfaces_error_body() {
            let router = Router::new().route(
                "/v1/embeddings",
                post(|| async {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({ "message": "Unauthorized", "request_id": "abc" })),
                    )
                }),
            );

            let client = MistralClient::new("wrong").with_endpoint(&serve(router).await);

            let error = client.embed(&["text"], MISTRAL_EMBED).await.unwrap_err();

            let LlmError::Mistral(error) = error else {
                panic!("expected a Mistral error, got {error:?}");
            };
            assert_eq!(401, error.status);
            assert_eq!("Unauthorized", error.message);
        }

        #[tokio::test]
        async fn embed_rejects_empty_input() {
            let client = MistralClient::new("key").with_endpoint("http://127.0.0.1:1");
            let error = client.embed(&[], MISTRAL_EMBED).await.unwrap_err();
            assert!(matches!(error, LlmError::InvalidInput(_)));
        }
    }
}
