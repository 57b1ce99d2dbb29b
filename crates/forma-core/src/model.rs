use serde::{Deserialize, Serialize};

/// A displayable generation result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Model {
    /// Location of the 3D asset. Either an http(s) URL or a path to an
    /// extracted file on disk.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    /// Bundled showcase asset. Local models are never written to history.
    #[serde(default)]
    pub local: bool,
}

impl Model {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            poster: None,
            local: false,
        }
    }

    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }

    fn bundled(url: &str, poster: Option<&str>) -> Self {
        Self {
            url: url.to_string(),
            poster: poster.map(str::to_string),
            local: true,
        }
    }

    /// Showcase assets shipped with the app. The first entry is the default
    /// preview before any generation has completed; the rest feed the
    /// inspiration shelf.
    pub fn bundled_defaults() -> Vec<Model> {
        vec![
            Model::bundled(
                "https://modelviewer.dev/shared-assets/models/Astronaut.glb",
                Some("https://modelviewer.dev/shared-assets/models/Astronaut.webp"),
            ),
            Model::bundled(
                "https://modelviewer.dev/shared-assets/models/NeilArmstrong.glb",
                None,
            ),
            Model::bundled(
                "https://modelviewer.dev/shared-assets/models/RobotExpressive.glb",
                None,
            ),
            Model::bundled(
                "https://modelviewer.dev/shared-assets/models/shishkebab.glb",
                None,
            ),
        ]
    }
}
