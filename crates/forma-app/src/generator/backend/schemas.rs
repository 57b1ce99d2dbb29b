use forma_core::params::GenerationParams;
use serde::{Deserialize, Serialize};

/// Response to the task creation endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskCreateResponse {
    #[serde(rename = "taskID", alias = "task_id")]
    pub task_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response to `GET /tasks/{id}/status`. Older service iterations used
/// `modelURL`/`thumbnailURL` for the result fields; the aliases keep those
/// parseable while snake_case stays the canonical contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskStatusResponse {
    pub status: String,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default, alias = "modelURL")]
    pub result_url: Option<String>,
    #[serde(default, alias = "thumbnailURL")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// JSON body for `POST /generate/text`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextGenerationBody<'a> {
    pub prompt: &'a str,
    pub face_limit: u32,
    pub texture: bool,
    pub texture_quality: &'a str,
    pub style: &'a str,
    pub quad: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_seed: Option<i64>,
}

impl<'a> TextGenerationBody<'a> {
    pub fn new(prompt: &'a str, params: &'a GenerationParams) -> Self {
        let negative = params.negative_prompt.trim();
        Self {
            prompt,
            face_limit: params.face_limit.faces(),
            texture: params.texture,
            texture_quality: params.texture_quality.id(),
            style: params.style.id(),
            quad: params.quad,
            negative_prompt: (!negative.is_empty()).then_some(negative),
            model_seed: params.model_seed,
        }
    }
}

/// Status vocabulary normalized case-insensitively. The raw service
/// vocabulary drifted across iterations (`DONE`, `RUN`, `SUCCESS`), so the
/// client accepts the known aliases and ignores everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireStatus {
    Completed,
    Failed,
    InFlight,
    Unknown,
}

pub fn normalize_status(raw: &str) -> WireStatus {
    match raw.to_ascii_lowercase().as_str() {
        "completed" | "done" | "success" => WireStatus::Completed,
        "failed" | "fail" | "error" => WireStatus::Failed,
        "processing" | "pending" | "queued" | "run" | "running" => WireStatus::InFlight,
        _ => WireStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_response_accepts_both_id_spellings() {
        let a: TaskCreateResponse =
            serde_json::from_str(r#"{"taskID":"t1","status":"pending","message":"queued"}"#)
                .unwrap();
        assert_eq!(a.task_id, "t1");

        let b: TaskCreateResponse = serde_json::from_str(r#"{"task_id":"t2"}"#).unwrap();
        assert_eq!(b.task_id, "t2");
        assert_eq!(b.message, None);
    }

    #[test]
    fn test_status_response_aliases() {
        let resp: TaskStatusResponse = serde_json::from_str(
            r#"{"status":"completed","modelURL":"https://x/bear.glb","thumbnailURL":"https://x/bear.png"}"#,
        )
        .unwrap();
        assert_eq!(resp.result_url.as_deref(), Some("https://x/bear.glb"));
        assert_eq!(resp.thumbnail_url.as_deref(), Some("https://x/bear.png"));
    }

    #[test]
    fn test_text_body_wire_shape() {
        let params = GenerationParams::default();
        let body = TextGenerationBody::new("a brown bear", &params);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["prompt"], "a brown bear");
        assert_eq!(json["faceLimit"], 10_000);
        assert_eq!(json["textureQuality"], "standard");
        assert!(json.get("negativePrompt").is_none());
        assert!(json.get("modelSeed").is_none());
    }

    #[test]
    fn test_text_body_carries_negative_prompt_when_set() {
        let mut params = GenerationParams::default();
        params.negative_prompt = "blurry, low poly".to_string();
        let body = TextGenerationBody::new("a brown bear", &params);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["negativePrompt"], "blurry, low poly");
    }

    #[test]
    fn test_normalize_status() {
        assert_eq!(normalize_status("DONE"), WireStatus::Completed);
        assert_eq!(normalize_status("completed"), WireStatus::Completed);
        assert_eq!(normalize_status("RUN"), WireStatus::InFlight);
        assert_eq!(normalize_status("pending"), WireStatus::InFlight);
        assert_eq!(normalize_status("FAILED"), WireStatus::Failed);
        assert_eq!(normalize_status("banana"), WireStatus::Unknown);
    }
}
