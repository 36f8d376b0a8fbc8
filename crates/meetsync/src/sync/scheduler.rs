//! Periodic reconciliation on a dedicated thread.
//!
//! The scheduler owns a single-threaded tokio runtime so the engine's
//! async platform calls never compete with the caller's runtime. One
//! pass runs at a time; a manual trigger between ticks runs the next
//! pass early instead of in parallel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Utc;
use log::{error, info};
use tokio::sync::broadcast;

use crate::sync::engine::SyncEngine;

pub struct SyncScheduler {
    engine: Arc<SyncEngine>,
    interval: Duration,
    shutdown: Arc<AtomicBool>,
}

impl SyncScheduler {
    pub fn new(engine: Arc<SyncEngine>, interval: Duration) -> Self {
        Self {
            engine,
            interval,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Spawns the scheduler thread. The first pass runs one full interval
    /// after start; send on the trigger channel to run one sooner.
    pub fn start(&self, mut trigger_rx: broadcast::Receiver<()>) -> JoinHandle<()> {
        let engine = Arc::clone(&self.engine);
        let interval = self.interval;
        let shutdown = Arc::clone(&self.shutdown);

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async move {
                let mut interval_timer = tokio::time::interval(interval);
                interval_timer.tick().await; // skip the immediate first tick

                loop {
                    if shutdown.load(Ordering::Acquire) {
                        break;
                    }

                    tokio::select! {
                        _ = interval_timer.tick() => {}
                        Ok(()) = trigger_rx.recv() => {
                            info!("Manual reconciliation pass triggered");
                        }
                    }

                    if shutdown.load(Ordering::Acquire) {
                        break;
                    }

                    match engine.check_events(Utc::now()).await {
                        Ok(summary) => {
                            if summary.records_changed > 0 || summary.stage_failures > 0 {
                                info!("Reconciliation pass: {}", summary);
                            }
                        }
                        Err(e) => error!("Reconciliation pass failed: {}", e),
                    }
                }

                info!("Reconciliation scheduler stopped");
            });
        })
    }

    /// Signals the scheduler thread to exit after its current wait or pass.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Release);
    }
}
