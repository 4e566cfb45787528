//! Single-flight facade over the classification and closing stages.
//!
//! Collaborator calls are blocking, so every operation runs on tokio's blocking
//! pool. Only one browser-touching operation may be outstanding at a time;
//! others fail fast with [`Error::Busy`] rather than interleaving commands with
//! a running close plan.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::oneshot;
use tracing::debug;

use crate::classify::classify_snapshot;
use crate::error::{Error, Result};
use crate::provider::{BrowserAutomation, HistoryStore};
use crate::reconcile::{self, CloseProgress, ClosePlan, CloseReport, CloseRequest};
use crate::staleness::StaleThreshold;
use crate::tab::Classification;

/// Releases the in-flight flag when the owning task finishes.
struct FlightGuard(Arc<AtomicBool>);

impl Drop for FlightGuard {
	fn drop(&mut self) {
		self.0.store(false, Ordering::Release);
	}
}

pub struct Engine {
	browser: Arc<dyn BrowserAutomation>,
	history: Arc<dyn HistoryStore>,
	threshold: StaleThreshold,
	in_flight: Arc<AtomicBool>,
}

impl Engine {
	pub fn new(browser: Arc<dyn BrowserAutomation>, history: Arc<dyn HistoryStore>, threshold: StaleThreshold) -> Self {
		Self {
			browser,
			history,
			threshold,
			in_flight: Arc::new(AtomicBool::new(false)),
		}
	}

	pub fn threshold(&self) -> StaleThreshold {
		self.threshold
	}

	/// Whether a snapshot or closure is currently running.
	pub fn is_busy(&self) -> bool {
		self.in_flight.load(Ordering::Acquire)
	}

	fn acquire(&self) -> Result<FlightGuard> {
		self.in_flight
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.map(|_| FlightGuard(Arc::clone(&self.in_flight)))
			.map_err(|_| Error::Busy)
	}

	/// Enumerates the browser and classifies the snapshot.
	pub async fn classify(&self) -> Result<Classification> {
		let guard = self.acquire()?;
		let browser = Arc::clone(&self.browser);
		let history = Arc::clone(&self.history);
		let threshold = self.threshold;

		tokio::task::spawn_blocking(move || {
			let _guard = guard;
			let raw = browser.enumerate()?;
			Ok(classify_snapshot(raw, threshold, Utc::now(), history.as_ref()))
		})
		.await
		.map_err(|err| Error::TaskFailed(err.to_string()))?
	}

	/// Resolves `request` against a fresh snapshot without closing anything.
	pub async fn preview_close(&self, request: CloseRequest) -> Result<ClosePlan> {
		let guard = self.acquire()?;
		let browser = Arc::clone(&self.browser);

		tokio::task::spawn_blocking(move || {
			let _guard = guard;
			reconcile::preview(browser.as_ref(), &request)
		})
		.await
		.map_err(|err| Error::TaskFailed(err.to_string()))?
	}

	/// Starts closing `request` in the background.
	///
	/// Returns immediately; the ticket resolves once with the final report.
	/// Must be called from within a tokio runtime. Dropping the ticket does not
	/// stop the plan.
	pub fn submit_close(&self, request: CloseRequest) -> Result<CloseTicket> {
		let runtime = tokio::runtime::Handle::try_current().map_err(|err| Error::TaskFailed(err.to_string()))?;
		let guard = self.acquire()?;
		let browser = Arc::clone(&self.browser);
		let progress = Arc::new(CloseProgress::default());
		let (tx, rx) = oneshot::channel();

		debug!(
			target = "tabsweep.engine",
			urls = request.urls.len(),
			windows = request.emptied_windows.len(),
			"closure submitted"
		);

		let task_progress = Arc::clone(&progress);
		runtime.spawn_blocking(move || {
			let outcome = reconcile::close_selection(browser.as_ref(), &request, &task_progress);
			// release before reporting so the receiver can start the next operation
			drop(guard);
			let _ = tx.send(outcome);
		});

		Ok(CloseTicket { rx, progress })
	}
}

/// Handle to an outstanding closure.
pub struct CloseTicket {
	rx: oneshot::Receiver<Result<CloseReport>>,
	progress: Arc<CloseProgress>,
}

impl CloseTicket {
	pub fn progress(&self) -> &CloseProgress {
		&self.progress
	}

	/// Waits for the terminal result of the closure.
	pub async fn wait(self) -> Result<CloseReport> {
		self.rx
			.await
			.map_err(|_| Error::TaskFailed("closure task ended without a result".to_string()))?
	}
}
