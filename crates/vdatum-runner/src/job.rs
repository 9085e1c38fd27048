//! Bulk transforms on a background worker thread.
//!
//! The worker owns a clone of the shared [`SurfaceManager`] and reports exactly
//! one [`BulkOutcome`] over a channel before exiting.

use crate::{Result, RunnerError};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use vdatum_surface::SurfaceManager;
use vdatum_transform::{transform_file, BulkOutcome, BulkRequest, TransformOptions};

/// Handle to a running bulk job.
pub struct BulkJobHandle {
    input: PathBuf,
    outcome_rx: Receiver<BulkOutcome>,
    thread: JoinHandle<()>,
}

impl BulkJobHandle {
    /// Block until the job reports its outcome, then join the thread.
    ///
    /// Logs a progress line every `progress_interval` while the job runs.
    pub fn wait(self, progress_interval: Duration) -> Result<BulkOutcome> {
        let start = Instant::now();
        let outcome = loop {
            match self.outcome_rx.recv_timeout(progress_interval) {
                Ok(outcome) => break outcome,
                Err(RecvTimeoutError::Timeout) => info!(
                    input = %self.input.display(),
                    elapsed_s = start.elapsed().as_secs_f64(),
                    "Bulk transform still running"
                ),
                Err(RecvTimeoutError::Disconnected) => return Err(RunnerError::WorkerDisconnected),
            }
        };
        self.thread
            .join()
            .map_err(|_| RunnerError::WorkerDisconnected)?;
        Ok(outcome)
    }
}

/// Start a bulk transform on its own thread.
pub fn spawn_bulk_job(
    manager: Arc<SurfaceManager>,
    options: TransformOptions,
    request: BulkRequest,
) -> Result<BulkJobHandle> {
    let (outcome_tx, outcome_rx) = crossbeam_channel::bounded(1);
    let input = request.input.clone();

    let thread = thread::Builder::new()
        .name("vdatum-bulk".to_string())
        .spawn(move || {
            debug!(input = %request.input.display(), "Bulk worker started");
            let outcome = transform_file(&manager, &options, &request);
            // The receiver may have been dropped; nothing left to report to.
            let _ = outcome_tx.send(outcome);
        })?;

    Ok(BulkJobHandle {
        input,
        outcome_rx,
        thread,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use vdatum_surface::{ControlPoint, Surface, SurfaceCatalog};

    const TICK: Duration = Duration::from_millis(20);

    fn manager() -> Arc<SurfaceManager> {
        let manager = SurfaceManager::new(SurfaceCatalog::new("/nonexistent/dir"));
        manager
            .insert_control_points(
                Surface::Geoid,
                vec![
                    ControlPoint::new(120.0, 22.0, 18.0),
                    ControlPoint::new(124.0, 22.0, 20.0),
                    ControlPoint::new(122.0, 26.0, 22.0),
                ]
                .into(),
            )
            .unwrap();
        Arc::new(manager)
    }

    #[test]
    fn test_job_reports_outcome() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.xyz");
        fs::write(&input, "122.0 23.0 5.0\n126.0 23.0 5.0\n").unwrap();

        let handle = spawn_bulk_job(
            manager(),
            TransformOptions::new(Surface::Geoid, Surface::Ellipsoid),
            BulkRequest::new(&input, dir.path().join("out"), "out.xyz"),
        )
        .unwrap();
        let outcome = handle.wait(TICK).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.outside_points, 1);
        assert!(dir.path().join("out").join("out.xyz").is_file());
    }

    #[test]
    fn test_job_failure_is_an_outcome() {
        let dir = TempDir::new().unwrap();
        let handle = spawn_bulk_job(
            manager(),
            TransformOptions::default(),
            BulkRequest::new(dir.path().join("missing.xyz"), dir.path(), "out.xyz"),
        )
        .unwrap();

        let outcome = handle.wait(Duration::from_millis(1)).unwrap();
        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Error: "));
    }

    #[test]
    fn test_job_shares_manager() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.xyz");
        fs::write(&input, "122.0 23.0 5.0\n").unwrap();
        let manager = manager();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                spawn_bulk_job(
                    Arc::clone(&manager),
                    TransformOptions::new(Surface::Geoid, Surface::Ellipsoid),
                    BulkRequest::new(&input, dir.path(), format!("out_{i}.xyz")),
                )
                .unwrap()
            })
            .collect();

        let outputs: Vec<String> = handles
            .into_iter()
            .map(|h| {
                let outcome = h.wait(TICK).unwrap();
                fs::read_to_string(outcome.output_path.unwrap()).unwrap()
            })
            .collect();
        assert!(outputs.iter().all(|o| o == &outputs[0]));
        assert!(manager.is_built(Surface::Geoid));
    }
}
