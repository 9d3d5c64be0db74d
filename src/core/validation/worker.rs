//! Background validation worker
//!
//! Validation runs on a dedicated thread fed through channels. Every request
//! carries a full snapshot of its inputs and a request number; the worker
//! keeps no state between requests. Callers keep the last request number
//! they sent in a [`RequestTracker`] and drop any response that does not
//! carry it, so a slow result for an old edit never replaces a newer one.

use super::{validate, CreditThresholds, ValidationReport};
use crate::core::catalog::CatalogStatus;
use crate::core::error::WorkerError;
use crate::core::models::{Course, Major, Schedule};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Inputs for one validation pass
///
/// Serializes as `{major, schedule?, taken, concentration?, requestNumber}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRequest {
    /// Major snapshot
    pub major: Major,
    /// Schedule snapshot
    #[serde(default)]
    pub schedule: Schedule,
    /// Courses counted toward requirements
    #[serde(default)]
    pub taken: Vec<Course>,
    /// Selected concentration title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration: Option<String>,
    /// Catalog state of the inputs, copied into the report
    #[serde(default)]
    pub catalog: CatalogStatus,
    /// Sequence number; assigned by [`ValidationWorker::submit`]
    #[serde(default)]
    pub request_number: u64,
}

impl WorkerRequest {
    /// Request counting every course placed in `schedule` as taken
    #[must_use]
    pub fn new(major: Major, schedule: Schedule) -> Self {
        let taken = schedule.taken_courses();
        Self {
            major,
            schedule,
            taken,
            concentration: None,
            catalog: CatalogStatus::default(),
            request_number: 0,
        }
    }

    /// Override the taken courses
    #[must_use]
    pub fn with_taken(mut self, taken: Vec<Course>) -> Self {
        self.taken = taken;
        self
    }

    /// Select a concentration
    #[must_use]
    pub fn with_concentration(mut self, concentration: Option<String>) -> Self {
        self.concentration = concentration;
        self
    }

    /// Attach catalog resolution state
    #[must_use]
    pub fn with_catalog_status(mut self, catalog: CatalogStatus) -> Self {
        self.catalog = catalog;
        self
    }
}

/// Messages sent from the worker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum WorkerMessage {
    /// The worker is running and ready for requests
    Loaded,
    /// Report for one request
    ValidationResult {
        /// The report
        result: Box<ValidationReport>,
        /// Number of the request this answers
        #[serde(rename = "requestNumber")]
        request_number: u64,
    },
}

/// Issues request numbers and decides which responses are current
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    /// Tracker with nothing sent yet
    #[must_use]
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Number for the next request; strictly increasing
    pub fn next_number(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Last number handed out (0 before the first request)
    #[must_use]
    pub const fn latest(&self) -> u64 {
        self.latest
    }

    /// Whether a response for `request_number` should be shown
    #[must_use]
    pub const fn is_current(&self, request_number: u64) -> bool {
        request_number != 0 && request_number == self.latest
    }
}

/// Handle to a running validation thread
///
/// Dropping the handle closes the request channel and joins the thread.
pub struct ValidationWorker {
    requests: Option<Sender<WorkerRequest>>,
    responses: Receiver<WorkerMessage>,
    handle: Option<JoinHandle<()>>,
    tracker: RequestTracker,
}

fn run(
    requests: &Receiver<WorkerRequest>,
    responses: &Sender<WorkerMessage>,
    thresholds: &CreditThresholds,
) {
    if responses.send(WorkerMessage::Loaded).is_err() {
        return;
    }
    for request in requests {
        crate::debug!("Worker validating request {}", request.request_number);
        let result = validate(
            &request.major,
            &request.schedule,
            &request.taken,
            request.concentration.as_deref(),
            thresholds,
        )
        .with_catalog_status(request.catalog);
        let message = WorkerMessage::ValidationResult {
            result: Box::new(result),
            request_number: request.request_number,
        };
        if responses.send(message).is_err() {
            break;
        }
    }
    crate::debug!("Validation worker stopped");
}

impl ValidationWorker {
    /// Start the worker thread
    ///
    /// # Errors
    /// Returns [`WorkerError::Spawn`] if the thread cannot be created
    pub fn spawn(thresholds: CreditThresholds) -> Result<Self, WorkerError> {
        let (request_tx, request_rx) = mpsc::channel::<WorkerRequest>();
        let (response_tx, response_rx) = mpsc::channel::<WorkerMessage>();

        let handle = thread::Builder::new()
            .name("validation-worker".to_string())
            .spawn(move || run(&request_rx, &response_tx, &thresholds))
            .map_err(WorkerError::Spawn)?;

        crate::info!("Validation worker started");
        Ok(Self {
            requests: Some(request_tx),
            responses: response_rx,
            handle: Some(handle),
            tracker: RequestTracker::new(),
        })
    }

    /// Send a request, numbering it after every earlier one
    ///
    /// # Returns
    /// The request number assigned
    ///
    /// # Errors
    /// Returns [`WorkerError::Disconnected`] if the worker has exited
    pub fn submit(&mut self, mut request: WorkerRequest) -> Result<u64, WorkerError> {
        let number = self.tracker.next_number();
        request.request_number = number;
        self.requests
            .as_ref()
            .ok_or(WorkerError::Disconnected)?
            .send(request)
            .map_err(|_| WorkerError::Disconnected)?;
        Ok(number)
    }

    /// The tracker holding the latest request number
    #[must_use]
    pub const fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// Block for the next message of any kind
    ///
    /// # Errors
    /// Returns [`WorkerError::Disconnected`] if the worker has exited
    pub fn recv(&self) -> Result<WorkerMessage, WorkerError> {
        self.responses.recv().map_err(|_| WorkerError::Disconnected)
    }

    /// Next message if one is waiting
    ///
    /// # Errors
    /// Returns [`WorkerError::Disconnected`] if the worker has exited
    pub fn try_recv(&self) -> Result<Option<WorkerMessage>, WorkerError> {
        match self.responses.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }

    /// Wait up to `timeout` for the next message
    ///
    /// # Errors
    /// Returns [`WorkerError::Disconnected`] if the worker has exited
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<WorkerMessage>, WorkerError> {
        match self.responses.recv_timeout(timeout) {
            Ok(message) => Ok(Some(message)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }

    /// Block until the report for the latest submitted request arrives,
    /// dropping `Loaded` and any superseded results on the way
    ///
    /// # Errors
    /// Returns [`WorkerError::Disconnected`] if the worker exits first
    pub fn wait_for_latest(&self) -> Result<ValidationReport, WorkerError> {
        loop {
            match self.recv()? {
                WorkerMessage::Loaded => {}
                WorkerMessage::ValidationResult {
                    result,
                    request_number,
                } => {
                    if self.tracker.is_current(request_number) {
                        return Ok(*result);
                    }
                    crate::debug!(
                        "Discarding stale result {request_number} (latest {})",
                        self.tracker.latest()
                    );
                }
            }
        }
    }
}

impl Drop for ValidationWorker {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                crate::error!("Validation worker panicked");
            }
        }
    }
}
