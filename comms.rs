/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Coordinator-to-presentation event channel.
//!
//! When surface ownership and UI rendering live in separate processes,
//! the coordinator pushes tab-scoped state messages one way over this
//! channel. Delivery is at-most-once: every payload is a current-state
//! snapshot, so a dropped message is repaired by the next one. The only
//! ordering that matters is per-tab lifecycle monotonicity, which the
//! engine-assigned `seq` preserves.

use crossbeam_channel::{Receiver, Sender, unbounded};
use serde::{Deserialize, Serialize};

use crate::app::TabId;
use crate::engine::SurfaceEventKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabEventMessage {
    pub seq: u64,
    pub tab_id: TabId,
    #[serde(flatten)]
    pub kind: TabEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TabEventKind {
    TabLoadingStart,
    TabLoadingStop {
        title: String,
        url: String,
        can_go_back: bool,
        can_go_forward: bool,
    },
    TabNavigate {
        url: String,
        can_go_back: bool,
        can_go_forward: bool,
    },
    TabTitleUpdate {
        title: String,
    },
    TabFaviconUpdate {
        favicon_url: String,
    },
}

impl TabEventKind {
    /// Presentation-facing rendering of a surface event. Popup requests
    /// are coordinator-internal and are not forwarded.
    pub fn from_surface_event(kind: &SurfaceEventKind) -> Option<Self> {
        match kind {
            SurfaceEventKind::LoadStart => Some(Self::TabLoadingStart),
            SurfaceEventKind::LoadStop {
                title,
                url,
                can_go_back,
                can_go_forward,
            } => Some(Self::TabLoadingStop {
                title: title.clone(),
                url: url.clone(),
                can_go_back: *can_go_back,
                can_go_forward: *can_go_forward,
            }),
            SurfaceEventKind::Navigated {
                url,
                can_go_back,
                can_go_forward,
            } => Some(Self::TabNavigate {
                url: url.clone(),
                can_go_back: *can_go_back,
                can_go_forward: *can_go_forward,
            }),
            SurfaceEventKind::TitleUpdated { title } => Some(Self::TabTitleUpdate {
                title: title.clone(),
            }),
            SurfaceEventKind::FaviconUpdated { favicon_url } => Some(Self::TabFaviconUpdate {
                favicon_url: favicon_url.clone(),
            }),
            SurfaceEventKind::PopupRequested { .. } => None,
        }
    }
}

/// Coordinator side of the channel. Serializes messages and pushes them
/// without waiting for acknowledgement; a disconnected presentation side
/// is tolerated silently.
pub struct StatePublisher {
    tx: Sender<String>,
}

impl StatePublisher {
    pub fn channel() -> (Self, Receiver<String>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    pub fn publish(&self, seq: u64, tab_id: TabId, kind: TabEventKind) {
        let message = TabEventMessage { seq, tab_id, kind };
        match serde_json::to_string(&message) {
            Ok(payload) => {
                let _ = self.tx.send(payload);
            }
            Err(error) => log::warn!("failed to encode tab event for {tab_id}: {error}"),
        }
    }
}
