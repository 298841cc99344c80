//! Periodic sweep scheduler.
//!
//! The engine itself never reads the wall clock or holds global state; this
//! component owns the background loop and is the single place `Utc::now()`
//! is sampled. Sweeps run inline in the loop, so the next tick always waits
//! for the previous sweep to finish — two sweeps never interleave.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;

use crate::sla::sweep::SweepEngine;

pub struct SweepScheduler {
    engine: Arc<SweepEngine>,
    interval: Duration,
    shutdown: Arc<AtomicBool>,
}

impl SweepScheduler {
    /// Creates a new scheduler. The interval normally comes from
    /// `SweepConfig::interval()` (default 60 minutes).
    pub fn new(engine: Arc<SweepEngine>, interval: Duration) -> Self {
        Self {
            engine,
            interval,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Starts the sweep loop in a background thread.
    /// Accepts a trigger receiver for manual sweep requests.
    pub fn start(&self, mut trigger_rx: broadcast::Receiver<()>) -> JoinHandle<()> {
        let engine = Arc::clone(&self.engine);
        let shutdown = Arc::clone(&self.shutdown);
        let interval = self.interval;

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("current-thread runtime builds");

            rt.block_on(async {
                let mut interval_timer = tokio::time::interval(interval);
                interval_timer.tick().await; // skip immediate first tick

                loop {
                    if shutdown.load(Ordering::Acquire) {
                        break;
                    }

                    tokio::select! {
                        _ = interval_timer.tick() => {},
                        Ok(()) = trigger_rx.recv() => {
                            log::info!("Manual SLA sweep triggered");
                        },
                    }

                    if shutdown.load(Ordering::Acquire) {
                        break;
                    }

                    match engine.run_sweep(Utc::now()) {
                        Ok(report) if !report.overdue.is_empty() || !report.reminded.is_empty() => {
                            log::info!(
                                "SLA sweep: {} overdue, {} reminded",
                                report.overdue.len(),
                                report.reminded.len()
                            );
                        }
                        Err(e) => log::error!("SLA sweep failed: {}", e),
                        _ => {}
                    }
                }
            });
        })
    }

    /// Signals the scheduler to stop.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Release);
    }
}
