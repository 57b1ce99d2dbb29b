pub mod model;
pub mod params;
pub mod progress;
pub mod request;
pub mod task;

pub use model::Model;
pub use request::{GenerationMode, GenerationRequest};
pub use task::TaskStatus;
