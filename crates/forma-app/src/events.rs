use forma_core::TaskStatus;

/// Emitted by the generator run loop back to the app loop.
#[derive(Debug, Clone, PartialEq)]
pub enum GenEvent {
    Status(TaskStatus),
    /// The backend rejected our credential. The app shuts the session down
    /// instead of showing a task failure.
    SessionExpired,
}

/// Every event carries the sequence number of the submission that produced
/// it. A response that resolves after its task was cancelled or replaced
/// arrives with a stale sequence and is dropped by the app.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskEvent {
    pub seq: u64,
    pub event: GenEvent,
}

impl TaskEvent {
    pub fn new(seq: u64, event: GenEvent) -> Self {
        Self { seq, event }
    }
}
