//! Interactive dashboard loop: render, ask for an action, apply it.
//!
//! Prompts block, so each one runs on the blocking pool while the clock and
//! any pending fetch keep running on the runtime.

use anyhow::{Context, Result};
use daymate_core::{
    ConfiguredGeolocator, Dashboard, DashboardError, DashboardState, FetchReport, FetchTask,
    ModalState,
};
use inquire::{InquireError, Select, Text};
use std::fmt;
use tokio::sync::watch;

use crate::view::DashboardView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    ChangeLocation,
    DeviceLocation,
    Refresh,
    Redraw,
    Quit,
}

impl Action {
    const ALL: [Action; 4] =
        [Action::ChangeLocation, Action::DeviceLocation, Action::Refresh, Action::Quit];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::ChangeLocation => "Change Location",
            Action::DeviceLocation => "Use device location",
            Action::Refresh => "Refresh",
            Action::Redraw => "Redraw",
            Action::Quit => "Quit",
        })
    }
}

pub async fn run(mut dashboard: Dashboard, geolocator: ConfiguredGeolocator, once: bool) -> Result<()> {
    let mut rx = dashboard.subscribe();

    let initial = dashboard.mount();
    if once {
        if let Some(task) = initial {
            task.await.context("weather fetch task failed")?;
        }
        println!("{}", DashboardView::new(&dashboard.snapshot()));
        return Ok(());
    }

    loop {
        wait_until_settled(&mut rx).await?;
        println!("{}", DashboardView::new(&dashboard.snapshot()));

        match prompt_action().await? {
            Action::ChangeLocation => {
                dashboard.open_modal();
                edit_location(&mut dashboard).await?;
            }
            Action::DeviceLocation => match dashboard.use_device_location(&geolocator).await {
                Ok(task) => detach(task),
                Err(err) => alert(&err),
            },
            Action::Refresh => detach(dashboard.refresh()),
            Action::Redraw => {}
            Action::Quit => break,
        }
    }

    Ok(())
}

/// The location modal: edit the draft, then confirm (Enter) or cancel (Esc).
async fn edit_location(dashboard: &mut Dashboard) -> Result<()> {
    let ModalState::Open { draft } = dashboard.modal().clone() else {
        return Ok(());
    };
    let help = format!(
        "Map: {} · Enter to confirm, Esc to cancel",
        dashboard.snapshot().map_preview_url
    );

    let answer = blocking_prompt(move || {
        Text::new("Select your location:")
            .with_initial_value(&draft)
            .with_placeholder("Enter location...")
            .with_help_message(&help)
            .prompt_skippable()
    })
    .await;

    match answer {
        Ok(Some(text)) => {
            dashboard.edit_draft(text);
            match dashboard.confirm() {
                Ok(task) => detach(task),
                Err(err) => {
                    alert(&err);
                    dashboard.cancel();
                }
            }
        }
        Ok(None) | Err(InquireError::OperationInterrupted) => dashboard.cancel(),
        Err(err) => {
            dashboard.cancel();
            return Err(err.into());
        }
    }

    Ok(())
}

/// Esc just re-renders; Ctrl-C quits.
async fn prompt_action() -> Result<Action> {
    match blocking_prompt(|| Select::new("What next?", Action::ALL.to_vec()).prompt_skippable()).await {
        Ok(Some(action)) => Ok(action),
        Ok(None) => Ok(Action::Redraw),
        Err(InquireError::OperationInterrupted) => Ok(Action::Quit),
        Err(err) => Err(err.into()),
    }
}

/// Run an `inquire` prompt on the blocking pool.
async fn blocking_prompt<T, F>(prompt: F) -> inquire::error::InquireResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> inquire::error::InquireResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(prompt)
        .await
        .unwrap_or_else(|err| Err(InquireError::Custom(Box::new(err))))
}

async fn wait_until_settled(rx: &mut watch::Receiver<DashboardState>) -> Result<()> {
    rx.wait_for(|state| !state.loading).await.context("dashboard state channel closed")?;
    Ok(())
}

/// Fetches run detached; the loop picks up their results from the state
/// channel. A watcher logs the report, or the join error if the task panicked.
fn detach(task: Option<FetchTask>) {
    match task {
        Some(task) => {
            tokio::spawn(settle(task));
        }
        None => tracing::debug!("no new fetch started"),
    }
}

async fn settle(task: FetchTask) -> Option<FetchReport> {
    match task.await {
        Ok(report) => {
            tracing::debug!(?report, "fetch settled");
            Some(report)
        }
        Err(err) => {
            tracing::error!(error = %err, "weather fetch task failed");
            None
        }
    }
}

fn alert(err: &DashboardError) {
    tracing::warn!(error = %err, "location action failed");
    eprintln!("⚠ {}", err.alert());
}
