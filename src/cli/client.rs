use anyhow::{anyhow, Context};
use reqwest::multipart;
use serde::Deserialize;
use serde_json::Value;

use super::config::Session;

/// Envelope every server response arrives in.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    data: Option<Value>,
    message: Option<String>,
    error: Option<String>,
    details: Option<Value>,
}

/// Thin HTTP client over the Memory Lane API. Unwraps the response
/// envelope and turns failures into readable errors.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug)]
pub struct ApiData {
    pub data: Value,
    pub message: Option<String>,
}

impl ApiClient {
    pub fn from_session(session: &Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: session.server_url.trim_end_matches('/').to_string(),
            token: session.token.clone(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> anyhow::Result<ApiData> {
        let response = builder.send().await.context("request failed")?;
        let status = response.status();
        let envelope: Envelope = response
            .json()
            .await
            .with_context(|| format!("unexpected response ({})", status))?;

        if envelope.success {
            Ok(ApiData {
                data: envelope.data.unwrap_or(Value::Null),
                message: envelope.message,
            })
        } else {
            let error = envelope.error.unwrap_or_else(|| status.to_string());
            match envelope.details {
                Some(details) => Err(anyhow!("{}: {}", error, details)),
                None => Err(anyhow!(error)),
            }
        }
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<ApiData> {
        self.send(self.request(reqwest::Method::GET, path).query(query)).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> anyhow::Result<ApiData> {
        self.send(self.request(reqwest::Method::POST, path).json(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> anyhow::Result<ApiData> {
        self.send(self.request(reqwest::Method::PUT, path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<ApiData> {
        self.send(self.request(reqwest::Method::DELETE, path)).await
    }

    /// Upload local files as an `images` multipart field.
    pub async fn upload(&self, path: &str, files: &[std::path::PathBuf]) -> anyhow::Result<ApiData> {
        let mut form = multipart::Form::new();
        for file in files {
            let bytes = tokio::fs::read(file)
                .await
                .with_context(|| format!("could not read {}", file.display()))?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            let mime = mime_guess::from_path(file).first_or_octet_stream();
            let part = multipart::Part::bytes(bytes)
                .file_name(name)
                .mime_str(mime.as_ref())?;
            form = form.part("images", part);
        }
        self.send(self.request(reqwest::Method::POST, path).multipart(form)).await
    }
}
