//! Daily crawl scheduling
//!
//! The scheduler runs a job once at startup, then checks the clock every
//! poll interval and runs the job again whenever the daily trigger is due.
//! A failed run is logged and the scheduler keeps waiting for the next
//! trigger. The loop ends on Ctrl-C or when the supplied shutdown future
//! completes.
//!
//! ```text
//! startup ──▶ run ──▶ ┌─ tick ─▶ due? ──yes──▶ run ─┐
//!                     └────────────◀────────────────┘
//!                           │
//!                        shutdown
//! ```

pub mod error;
pub mod trigger;

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use chrono::Local;
use tokio::time::MissedTickBehavior;

use crate::config::ScheduleConfig;
pub use error::{SchedulerError, SchedulerResult};
pub use trigger::DailyTrigger;

/// Drives a job on a daily trigger
pub struct Scheduler {
    trigger: DailyTrigger,
    poll_interval: Duration,
    run_on_startup: bool,
}

impl Scheduler {
    /// Create a scheduler from its configuration section
    pub fn new(config: &ScheduleConfig) -> SchedulerResult<Self> {
        if config.poll_interval_secs == 0 {
            return Err(SchedulerError::trigger_config(
                "poll_interval_secs",
                "must be greater than 0",
            ));
        }

        Ok(Self {
            trigger: DailyTrigger::parse(&config.run_at, Local::now().naive_local())?,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            run_on_startup: config.run_on_startup,
        })
    }

    /// Create a scheduler from explicit parts
    pub fn with_trigger(trigger: DailyTrigger, poll_interval: Duration, run_on_startup: bool) -> Self {
        Self {
            trigger,
            poll_interval,
            run_on_startup,
        }
    }

    pub fn trigger(&self) -> &DailyTrigger {
        &self.trigger
    }

    /// Run until Ctrl-C
    pub async fn run<F, Fut, T, E>(&mut self, job: F) -> SchedulerResult<usize>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let (tx, rx) = tokio::sync::oneshot::channel::<String>();
        let shutdown = async move {
            let result = tokio::signal::ctrl_c().await;
            let _ = tx.send(match result {
                Ok(()) => String::new(),
                Err(e) => e.to_string(),
            });
        };

        let runs = self.run_until(job, shutdown).await;

        match rx.await {
            Ok(reason) if !reason.is_empty() => Err(SchedulerError::SignalError { reason }),
            _ => Ok(runs),
        }
    }

    /// Run until `shutdown` completes, returning how many runs were started
    pub async fn run_until<F, Fut, T, E, S>(&mut self, mut job: F, shutdown: S) -> usize
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut runs = 0;

        if self.run_on_startup {
            tracing::info!("Running initial crawl on startup");
            tokio::select! {
                _ = Self::execute(&mut job) => runs += 1,
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested during startup run");
                    return runs;
                }
            }
        }

        tracing::info!(
            next_run = %self.trigger.next_run(),
            poll_secs = self.poll_interval.as_secs(),
            "Scheduler waiting for next run"
        );

        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if self.trigger.is_due(Local::now().naive_local()) {
                        Self::execute(&mut job).await;
                        runs += 1;
                        tracing::info!(next_run = %self.trigger.next_run(), "Next scheduled run");
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!(runs, "Scheduler stopped");
                    return runs;
                }
            }
        }
    }

    async fn execute<F, Fut, T, E>(job: &mut F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        if let Err(e) = job().await {
            let err = SchedulerError::execution_failed(e.to_string());
            tracing::error!(error = %err, "Scheduled run failed, waiting for next trigger");
        }
    }
}
