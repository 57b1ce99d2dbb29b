pub mod schemas;

use std::path::Path;

use async_trait::async_trait;
use forma_core::params::GenerationParams;
use log::debug;
use reqwest::multipart;

use crate::error::AppError;
use schemas::{TaskCreateResponse, TaskStatusResponse, TextGenerationBody};

/// Everything the orchestrator needs from the remote service. Behind a
/// trait so the run loop can be exercised against a scripted backend.
#[async_trait]
pub trait GenBackend: Send + Sync {
    async fn submit_text(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<TaskCreateResponse, AppError>;

    async fn submit_image(
        &self,
        path: &Path,
        params: &GenerationParams,
    ) -> Result<TaskCreateResponse, AppError>;

    async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse, AppError>;

    /// Download a result archive through the backend's fetch proxy
    async fn fetch_model(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Map a non-2xx response. 401 becomes `Unauthorized`; anything else
    /// surfaces the server's `message`/`msg` when the body parses, or a
    /// plain HTTP error when it does not.
    async fn error_from(response: reqwest::Response) -> AppError {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return AppError::Unauthorized;
        }
        let fallback = format!("HTTP {status}");
        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("message")
                .or_else(|| body.get("msg"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or(fallback),
            Err(_) => fallback,
        };
        AppError::Backend(message)
    }

    async fn image_part(path: &Path) -> Result<multipart::Part, AppError> {
        let bytes = tokio::fs::read(path).await?;
        let format = image::guess_format(&bytes)
            .map_err(|_| AppError::Image(path.display().to_string()))?;
        let mime = match format {
            image::ImageFormat::Png | image::ImageFormat::Jpeg => format.to_mime_type(),
            _ => return Err(AppError::Image(path.display().to_string())),
        };
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        Ok(multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)?)
    }
}

#[async_trait]
impl GenBackend for HttpBackend {
    async fn submit_text(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<TaskCreateResponse, AppError> {
        let url = format!("{}/generate/text", self.base_url);
        debug!("submitting text task to {url}");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&TextGenerationBody::new(prompt, params))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn submit_image(
        &self,
        path: &Path,
        params: &GenerationParams,
    ) -> Result<TaskCreateResponse, AppError> {
        let url = format!("{}/generate/image", self.base_url);
        debug!("submitting image task to {url}");

        let mut form = multipart::Form::new()
            .part("image", Self::image_part(path).await?)
            .text("faceLimit", params.face_limit.faces().to_string())
            .text("texture", params.texture.to_string())
            .text("textureQuality", params.texture_quality.id().to_string())
            .text(
                "textureAlignment",
                params.texture_alignment.id().to_string(),
            )
            .text("style", params.style.id().to_string())
            .text("quad", params.quad.to_string());
        if let Some(seed) = params.model_seed {
            form = form.text("modelSeed", seed.to_string());
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskStatusResponse, AppError> {
        let url = format!("{}/tasks/{}/status", self.base_url, task_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.json().await?)
    }

    async fn fetch_model(&self, url: &str) -> Result<Vec<u8>, AppError> {
        let proxy = format!("{}/proxy/model", self.base_url);
        debug!("downloading result archive via {proxy}");

        let response = self
            .client
            .get(&proxy)
            .query(&[("url", url)])
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(response.bytes().await?.to_vec())
    }
}
