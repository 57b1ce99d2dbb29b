use serde::{Deserialize, Serialize};

/// Face-count tier for the generated mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceLimitPreset {
    Low,
    Medium,
    High,
}

impl FaceLimitPreset {
    /// Face budget sent to the backend
    pub fn faces(&self) -> u32 {
        match self {
            Self::Low => 10_000,
            Self::Medium => 50_000,
            Self::High => 100_000,
        }
    }

    /// Label for display in UI
    pub fn label(&self) -> &str {
        match self {
            Self::Low => "Low (10k faces)",
            Self::Medium => "Medium (50k faces)",
            Self::High => "High (100k faces)",
        }
    }

    pub fn all() -> [FaceLimitPreset; 3] {
        [Self::Low, Self::Medium, Self::High]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureQuality {
    Standard,
    Detailed,
}

impl TextureQuality {
    /// Wire value for API communication
    pub fn id(&self) -> &str {
        match self {
            Self::Standard => "standard",
            Self::Detailed => "detailed",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Standard => "Standard",
            Self::Detailed => "Detailed",
        }
    }

    pub fn all() -> [TextureQuality; 2] {
        [Self::Standard, Self::Detailed]
    }
}

/// Texture alignment only applies to image mode: either stay faithful to
/// the uploaded image or let the backend re-texture freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureAlignment {
    OriginalImage,
    AiGenerated,
}

impl TextureAlignment {
    pub fn id(&self) -> &str {
        match self {
            Self::OriginalImage => "original_image",
            Self::AiGenerated => "ai_generated",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::OriginalImage => "Original image",
            Self::AiGenerated => "AI generated",
        }
    }

    pub fn all() -> [TextureAlignment; 2] {
        [Self::OriginalImage, Self::AiGenerated]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelStyle {
    None,
    Clay,
    Gold,
    AncientBronze,
    Steampunk,
}

impl ModelStyle {
    pub fn id(&self) -> &str {
        match self {
            Self::None => "",
            Self::Clay => "object:clay",
            Self::Gold => "gold",
            Self::AncientBronze => "ancient_bronze",
            Self::Steampunk => "object:steampunk",
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::None => "Default",
            Self::Clay => "Clay",
            Self::Gold => "Gold",
            Self::AncientBronze => "Ancient bronze",
            Self::Steampunk => "Steampunk",
        }
    }

    pub fn all() -> [ModelStyle; 5] {
        [
            Self::None,
            Self::Clay,
            Self::Gold,
            Self::AncientBronze,
            Self::Steampunk,
        ]
    }
}

/// Generation options shared by both modes. Collected by the params panel
/// and carried on every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub face_limit: FaceLimitPreset,
    pub texture: bool,
    pub texture_quality: TextureQuality,
    pub texture_alignment: TextureAlignment,
    pub style: ModelStyle,
    pub quad: bool,
    /// Text mode only
    pub negative_prompt: String,
    pub model_seed: Option<i64>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            face_limit: FaceLimitPreset::Low,
            texture: true,
            texture_quality: TextureQuality::Standard,
            texture_alignment: TextureAlignment::OriginalImage,
            style: ModelStyle::None,
            quad: false,
            negative_prompt: String::new(),
            model_seed: None,
        }
    }
}
