pub mod backend;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use forma_core::model::Model;
use forma_core::progress::ProgressSim;
use forma_core::request::{GenerationInput, GenerationRequest};
use forma_core::task::TaskStatus;
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::events::{GenEvent, TaskEvent};
use crate::extract;
use backend::schemas::{TaskStatusResponse, WireStatus, normalize_status};
use backend::GenBackend;

const DEFAULT_FAILURE: &str = "model generation failed";

/// Drives one generation request from submission to terminal state. The
/// whole lifecycle of a task lives in a single spawned run loop, so the
/// poll timer and the progress-simulation timer cannot outlive it: exiting
/// the loop drops both.
pub struct Generator {
    backend: Arc<dyn GenBackend>,
    events: mpsc::UnboundedSender<TaskEvent>,
    poll_interval: Duration,
    max_polls: u32,
    models_dir: PathBuf,
    seq: u64,
    active: Option<ActiveTask>,
}

struct ActiveTask {
    seq: u64,
    handle: JoinHandle<()>,
}

impl Generator {
    pub fn new(
        backend: Arc<dyn GenBackend>,
        events: mpsc::UnboundedSender<TaskEvent>,
        poll_interval: Duration,
        max_polls: u32,
        models_dir: PathBuf,
    ) -> Self {
        Self {
            backend,
            events,
            poll_interval,
            max_polls,
            models_dir,
            seq: 0,
            active: None,
        }
    }

    /// Sequence number of the latest submission. Events tagged with an
    /// older sequence belong to a cancelled or replaced task.
    pub fn current_seq(&self) -> u64 {
        self.seq
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Submit a request. No-op (returns false) while a task is running or
    /// when the request fails validation.
    pub fn submit(&mut self, request: GenerationRequest) -> bool {
        if self.active.is_some() || !request.is_submittable() {
            return false;
        }

        self.seq += 1;
        let seq = self.seq;
        let handle = tokio::spawn(run_task(
            self.backend.clone(),
            self.events.clone(),
            seq,
            request,
            self.poll_interval,
            self.max_polls,
            self.models_dir.clone(),
        ));
        self.active = Some(ActiveTask { seq, handle });
        true
    }

    /// Abort the active run loop without notifying the server (the backend
    /// contract has no cancellation RPC). Bumping the sequence makes any
    /// response that is still in flight arrive stale.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(task) => {
                task.handle.abort();
                self.seq += 1;
                info!("task cancelled");
                true
            }
            None => false,
        }
    }

    /// Called by the app once a terminal event for `seq` has been applied.
    pub fn task_finished(&mut self, seq: u64) {
        if self.active.as_ref().map(|t| t.seq) == Some(seq) {
            self.active = None;
        }
    }
}

impl Drop for Generator {
    fn drop(&mut self) {
        if let Some(task) = self.active.take() {
            task.handle.abort();
        }
    }
}

/// What a single status poll means for the task state machine
#[derive(Debug, Clone, PartialEq)]
enum PollOutcome {
    Completed {
        url: String,
        thumbnail: Option<String>,
    },
    Failed {
        error: String,
    },
    InFlight {
        progress: Option<u8>,
    },
    Ignored,
}

impl PollOutcome {
    fn from_response(resp: &TaskStatusResponse) -> Self {
        match normalize_status(&resp.status) {
            WireStatus::Completed => match &resp.result_url {
                Some(url) => Self::Completed {
                    url: url.clone(),
                    thumbnail: resp.thumbnail_url.clone(),
                },
                None => Self::Failed {
                    error: DEFAULT_FAILURE.to_string(),
                },
            },
            WireStatus::Failed => Self::Failed {
                error: resp
                    .error_message
                    .clone()
                    .unwrap_or_else(|| DEFAULT_FAILURE.to_string()),
            },
            WireStatus::InFlight => Self::InFlight {
                progress: resp.progress,
            },
            WireStatus::Unknown => Self::Ignored,
        }
    }
}

fn is_archive_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.to_ascii_lowercase().ends_with(".zip")
}

fn send(events: &mpsc::UnboundedSender<TaskEvent>, seq: u64, event: GenEvent) {
    // The receiver closing just means the app loop is gone
    let _ = events.send(TaskEvent::new(seq, event));
}

async fn run_task(
    backend: Arc<dyn GenBackend>,
    events: mpsc::UnboundedSender<TaskEvent>,
    seq: u64,
    request: GenerationRequest,
    poll_interval: Duration,
    max_polls: u32,
    models_dir: PathBuf,
) {
    let created = match &request.input {
        GenerationInput::Text { prompt } => {
            backend.submit_text(prompt.trim(), &request.params).await
        }
        GenerationInput::Image { path } => backend.submit_image(path, &request.params).await,
    };

    let created = match created {
        Ok(resp) => resp,
        Err(AppError::Unauthorized) => {
            send(&events, seq, GenEvent::SessionExpired);
            return;
        }
        Err(err) => {
            send(
                &events,
                seq,
                GenEvent::Status(TaskStatus::failed(format!(
                    "generation request failed: {err}"
                ))),
            );
            return;
        }
    };

    info!("task {} created", created.task_id);
    let mut sim = ProgressSim::new();
    send(
        &events,
        seq,
        GenEvent::Status(TaskStatus::processing(
            Some(sim.progress()),
            None,
            created
                .message
                .clone()
                .or_else(|| Some("Task created, waiting for processing".to_string())),
        )),
    );

    let mut poll_timer = tokio::time::interval(poll_interval);
    let mut sim_timer = tokio::time::interval(Duration::from_secs(1));
    // Both intervals fire immediately on creation; swallow that so the
    // first real poll lands a full interval after submission.
    poll_timer.tick().await;
    sim_timer.tick().await;

    let mut polls = 0u32;

    loop {
        tokio::select! {
            _ = sim_timer.tick() => {
                sim.tick();
                send(
                    &events,
                    seq,
                    GenEvent::Status(TaskStatus::processing(
                        Some(sim.progress()),
                        Some(sim.eta()),
                        None,
                    )),
                );
            }
            _ = poll_timer.tick() => {
                polls += 1;
                if polls > max_polls {
                    warn!("task {} exceeded {} polls", created.task_id, max_polls);
                    send(
                        &events,
                        seq,
                        GenEvent::Status(TaskStatus::failed("generation timed out")),
                    );
                    return;
                }

                let resp = match backend.task_status(&created.task_id).await {
                    Ok(resp) => resp,
                    Err(AppError::Unauthorized) => {
                        send(&events, seq, GenEvent::SessionExpired);
                        return;
                    }
                    Err(err) => {
                        send(
                            &events,
                            seq,
                            GenEvent::Status(TaskStatus::failed(format!(
                                "status poll failed: {err}"
                            ))),
                        );
                        return;
                    }
                };

                match PollOutcome::from_response(&resp) {
                    PollOutcome::Completed { url, thumbnail } => {
                        let status = if is_archive_url(&url) {
                            send(&events, seq, GenEvent::Status(TaskStatus::Unzipping));
                            match fetch_and_extract(backend.as_ref(), &url, &models_dir).await {
                                Ok(path) => {
                                    let model = Model::new(path.to_string_lossy());
                                    TaskStatus::Completed {
                                        model: match thumbnail {
                                            Some(t) => model.with_poster(t),
                                            None => model,
                                        },
                                    }
                                }
                                Err(err) => {
                                    TaskStatus::failed(format!("model extraction failed: {err}"))
                                }
                            }
                        } else {
                            let model = Model::new(url);
                            TaskStatus::Completed {
                                model: match thumbnail {
                                    Some(t) => model.with_poster(t),
                                    None => model,
                                },
                            }
                        };
                        send(&events, seq, GenEvent::Status(status));
                        return;
                    }
                    PollOutcome::Failed { error } => {
                        send(&events, seq, GenEvent::Status(TaskStatus::Failed { error }));
                        return;
                    }
                    PollOutcome::InFlight { progress } => {
                        if let Some(p) = progress {
                            sim.merge_server_progress(p);
                        }
                    }
                    PollOutcome::Ignored => {
                        debug!(
                            "ignoring unrecognized status {:?} for task {}",
                            resp.status, created.task_id
                        );
                    }
                }
            }
        }
    }
}

async fn fetch_and_extract(
    backend: &dyn GenBackend,
    url: &str,
    models_dir: &Path,
) -> Result<PathBuf, AppError> {
    let bytes = backend.fetch_model(url).await?;
    extract::extract_model_archive(&bytes, models_dir)
}
