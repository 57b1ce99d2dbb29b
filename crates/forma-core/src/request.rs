use std::path::{Path, PathBuf};

use crate::params::GenerationParams;

/// Longest prompt the backend accepts
pub const MAX_PROMPT_CHARS: usize = 150;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    Text,
    Image,
}

impl GenerationMode {
    pub fn label(&self) -> &str {
        match self {
            Self::Text => "Text to 3D",
            Self::Image => "Image to 3D",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Text => Self::Image,
            Self::Image => Self::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationInput {
    Text { prompt: String },
    Image { path: PathBuf },
}

/// One user intent: what to generate and with which options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub input: GenerationInput,
    pub params: GenerationParams,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            input: GenerationInput::Text {
                prompt: prompt.into(),
            },
            params,
        }
    }

    pub fn image(path: impl Into<PathBuf>, params: GenerationParams) -> Self {
        Self {
            input: GenerationInput::Image { path: path.into() },
            params,
        }
    }

    pub fn mode(&self) -> GenerationMode {
        match self.input {
            GenerationInput::Text { .. } => GenerationMode::Text,
            GenerationInput::Image { .. } => GenerationMode::Image,
        }
    }

    /// Pre-flight validation. An unsubmittable request is silently ignored
    /// by the orchestrator; there is no error state for it.
    pub fn is_submittable(&self) -> bool {
        match &self.input {
            GenerationInput::Text { prompt } => {
                let trimmed = prompt.trim();
                !trimmed.is_empty() && trimmed.chars().count() <= MAX_PROMPT_CHARS
            }
            GenerationInput::Image { path } => has_image_extension(path),
        }
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
