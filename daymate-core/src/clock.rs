use chrono::{DateTime, Local};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use crate::model::DashboardState;

/// Periodic task refreshing `DashboardState::now`.
///
/// The task is aborted when the handle is dropped.
#[derive(Debug)]
pub struct ClockHandle {
    task: JoinHandle<()>,
}

impl ClockHandle {
    pub fn spawn(period: Duration, state: Arc<watch::Sender<DashboardState>>) -> Self {
        Self::spawn_with(period, state, Local::now)
    }

    pub fn spawn_with<F>(period: Duration, state: Arc<watch::Sender<DashboardState>>, now: F) -> Self
    where
        F: Fn() -> DateTime<Local> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let at = now();
                state.send_modify(|s| s.now = at);
            }
        });

        Self { task }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for ClockHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// `02:05 PM`
pub fn format_time(now: &DateTime<Local>) -> String {
    now.format("%I:%M %p").to_string()
}

/// `Thu, Nov 27, 2025`
pub fn format_date(now: &DateTime<Local>) -> String {
    now.format("%a, %b %-d, %Y").to_string()
}
