use crate::model::Model;

/// Lifecycle of one generation task. Exactly one state holds at a time;
/// transitions are one-directional except Processing -> Processing
/// (progress updates). Only the poll path may produce Completed or Failed;
/// the progress simulation never resolves a task on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskStatus {
    Idle,
    Processing {
        progress: Option<u8>,
        eta: Option<u64>,
        message: Option<String>,
    },
    /// Post-processing phase for archive-packaged results
    Unzipping,
    Completed {
        model: Model,
    },
    Failed {
        error: String,
    },
}

impl TaskStatus {
    pub fn processing(progress: Option<u8>, eta: Option<u64>, message: Option<String>) -> Self {
        Self::Processing {
            progress,
            eta,
            message,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    /// A task is in flight: new submissions and model selection are blocked.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Processing { .. } | Self::Unzipping)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Idle => "Ready",
            Self::Processing { .. } => "Generating",
            Self::Unzipping => "Unpacking model",
            Self::Completed { .. } => "Completed",
            Self::Failed { .. } => "Failed",
        }
    }
}
