//! Back half of the delivery saga.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::ledger::PackageStatus;
use crate::metrics::{COMPLETION_STEPS, TRANSIT_DURATION};
use crate::pool::Resource;
use crate::service::{PackageLedger, ResourceService, ServiceError};

/// Side effects performed once transit is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStep {
    UpdatePackage,
    ReleaseShip,
    ReleaseCrew,
}

impl CompletionStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStep::UpdatePackage => "update_package",
            CompletionStep::ReleaseShip => "release_ship",
            CompletionStep::ReleaseCrew => "release_crew",
        }
    }
}

impl fmt::Display for CompletionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completion step failed. Logged, never retried, never surfaced to the
/// original caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{step} failed: {source}")]
pub struct CompletionError {
    pub step: CompletionStep,
    #[source]
    pub source: ServiceError,
}

/// Everything a completion task needs to know about its delivery.
#[derive(Debug, Clone)]
pub struct CompletionJob {
    pub package_id: String,
    pub crew: Resource,
    pub ship: Resource,
    pub transit: Duration,
}

/// Outcome of one completion task.
#[derive(Debug, Clone)]
pub struct CompletionReport {
    pub package_id: String,
    pub transit: Duration,
    /// Transit was cut short by shutdown.
    pub interrupted: bool,
    pub package_updated: Result<(), CompletionError>,
    pub ship_released: Result<(), CompletionError>,
    pub crew_released: Result<(), CompletionError>,
}

impl CompletionReport {
    /// All three side effects succeeded.
    pub fn is_clean(&self) -> bool {
        self.package_updated.is_ok() && self.ship_released.is_ok() && self.crew_released.is_ok()
    }
}

/// Run one completion task to the end.
///
/// The transit wait is the only suspension point besides the collaborator
/// calls. Each of the three steps is attempted regardless of how the others
/// went.
pub async fn run_completion(
    job: CompletionJob,
    crew: Arc<dyn ResourceService>,
    ship: Arc<dyn ResourceService>,
    ledger: Arc<dyn PackageLedger>,
    mut shutdown: watch::Receiver<bool>,
) -> CompletionReport {
    info!(
        "Ship {} in flight for {:?} delivering package {}",
        job.ship.name, job.transit, job.package_id
    );

    let stop_requested = async {
        // A dropped sender means nobody can ask us to stop; let transit finish.
        if shutdown.wait_for(|stop| *stop).await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let interrupted = tokio::select! {
        _ = tokio::time::sleep(job.transit) => false,
        _ = stop_requested => {
            warn!("Transit of package {} cut short by shutdown", job.package_id);
            true
        }
    };
    if !interrupted {
        TRANSIT_DURATION
            .with_label_values(&[])
            .observe(job.transit.as_secs_f64());
    }

    let package_updated = record(
        CompletionStep::UpdatePackage,
        ledger
            .update_status(&job.package_id, PackageStatus::Delivered)
            .await
            .map(|_| ()),
    );
    if package_updated.is_ok() {
        info!("Package {} marked as delivered", job.package_id);
    }

    let ship_released = record(
        CompletionStep::ReleaseShip,
        ship.release(&job.ship.name).await.map(|_| ()),
    );
    if ship_released.is_ok() {
        info!("Ship {} returned to base", job.ship.name);
    }

    let crew_released = record(
        CompletionStep::ReleaseCrew,
        crew.release(&job.crew.name).await.map(|_| ()),
    );
    if crew_released.is_ok() {
        info!("Crew member {} returned to base", job.crew.name);
    }

    let report = CompletionReport {
        package_id: job.package_id,
        transit: job.transit,
        interrupted,
        package_updated,
        ship_released,
        crew_released,
    };
    if let Err(e) = &report.package_updated {
        error!("Package {} left in prior status: {}", report.package_id, e);
    }
    report
}

fn record(step: CompletionStep, result: Result<(), ServiceError>) -> Result<(), CompletionError> {
    match result {
        Ok(()) => {
            COMPLETION_STEPS
                .with_label_values(&[step.as_str(), "success"])
                .inc();
            Ok(())
        }
        Err(source) => {
            COMPLETION_STEPS
                .with_label_values(&[step.as_str(), "failed"])
                .inc();
            let err = CompletionError { step, source };
            error!("Completion step {}", err);
            Err(err)
        }
    }
}

/// Decrements the in-flight count when a task ends, even by panic.
struct InFlightGuard(Arc<watch::Sender<usize>>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Supervised set of completion tasks.
///
/// Tasks are detached from the tracker: dropping a waiter or the tracker
/// itself never aborts a delivery. Scheduling never blocks the caller, and
/// tests and shutdown can wait for every scheduled task via
/// [`CompletionTracker::wait_idle`].
pub struct CompletionTracker {
    reports: Arc<Mutex<Vec<CompletionReport>>>,
    in_flight: Arc<watch::Sender<usize>>,
    shutdown_tx: watch::Sender<bool>,
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(reports: &Mutex<Vec<CompletionReport>>) -> MutexGuard<'_, Vec<CompletionReport>> {
    reports.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CompletionTracker {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(watch::Sender::new(0)),
            shutdown_tx,
        }
    }

    /// Receiver that flips to `true` once shutdown starts.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Spawn a completion task onto the current runtime.
    ///
    /// When nothing is in flight, reports left over from earlier tasks are
    /// discarded here, so a long-running process does not accumulate them.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = CompletionReport> + Send + 'static,
    {
        self.in_flight.send_modify(|n| {
            if *n == 0 {
                lock(&self.reports).clear();
            }
            *n += 1;
        });
        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        let reports = Arc::clone(&self.reports);

        let handle = tokio::spawn(task);
        tokio::spawn(async move {
            let _guard = guard;
            match handle.await {
                Ok(report) => lock(&reports).push(report),
                Err(e) => error!("Completion task panicked: {}", e),
            }
        });
    }

    /// Number of completion tasks that have not finished yet.
    pub fn in_flight(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// Wait until every scheduled task has finished and collect their reports.
    ///
    /// Cancelling the returned future leaves the tasks running. Concurrent
    /// waiters all block until nothing is in flight; the reports go to
    /// whichever waiter collects them first.
    pub async fn wait_idle(&self) -> Vec<CompletionReport> {
        let mut idle = self.in_flight.subscribe();
        // The sender lives as long as `self`, so this cannot report closure.
        let _ = idle.wait_for(|n| *n == 0).await;
        std::mem::take(&mut *lock(&self.reports))
    }

    /// Cut every pending transit short and wait for the tasks to finish.
    ///
    /// Interrupted tasks still update the ledger and release their resources.
    pub async fn shutdown(&self) -> Vec<CompletionReport> {
        info!(
            "Shutting down completion tracker ({} in flight)",
            self.in_flight()
        );
        self.shutdown_tx.send_replace(true);
        self.wait_idle().await
    }
}
