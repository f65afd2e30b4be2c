//! Forwards the [`Controller`] view channel into the action queue.
//!
//! Runs as a background task: adopts the stored session (if any), then
//! forwards every published [`ViewState`](unet_core::ViewState) as an
//! [`Action::ViewUpdated`] until cancelled.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use unet_core::Controller;

use crate::action::{Action, Notification};

pub async fn spawn_data_bridge(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut view_rx = controller.subscribe();

    // Initial snapshot so the login screen draws before any request
    let snapshot = Arc::new(view_rx.borrow_and_update().clone());
    let _ = action_tx.send(Action::ViewUpdated(snapshot));

    // A stored token goes straight to the dashboard
    let restore = controller.clone();
    let restore_tx = action_tx.clone();
    tokio::spawn(async move {
        match restore.restore().await {
            Ok(true) => info!("resumed stored session"),
            Ok(false) => debug!("no stored session"),
            Err(e) => {
                warn!(error = %e, "failed to restore session");
                let _ = restore_tx.send(Action::Notify(Notification::error(e.to_string())));
            }
        }
    });

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = view_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = Arc::new(view_rx.borrow_and_update().clone());
                let _ = action_tx.send(Action::ViewUpdated(view));
            }
        }
    }

    debug!("data bridge shut down");
}
