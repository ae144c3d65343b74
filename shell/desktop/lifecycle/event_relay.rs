/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Surface event fan-in.
//!
//! The relay is the only place where surface lifecycle events flow back
//! into the tab registry. Events are drained on the control thread and
//! may arrive in any order relative to user intents; an event whose tab
//! id is no longer registered is discarded, since a close racing an
//! in-flight load is expected. Active-tab checks happen at drain time
//! against the registry, never against state captured at subscription
//! time.

use crossbeam_channel::Receiver;

use crate::app::{BrowserApp, BrowserIntent, TabDelta};
use crate::comms::{StatePublisher, TabEventKind};
use crate::engine::{SurfaceEvent, SurfaceEventKind};

pub struct EventRelay {
    events: Receiver<SurfaceEvent>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DrainOutcome {
    pub applied: usize,
    pub discarded: usize,
    /// The active tab saw a navigation-affecting event; the toolbar's
    /// capability projection must be recomputed from the live surface.
    pub nav_state_dirty: bool,
    /// Intents the session should apply next (popup opens).
    pub follow_ups: Vec<BrowserIntent>,
}

impl EventRelay {
    pub fn new(events: Receiver<SurfaceEvent>) -> Self {
        Self { events }
    }

    pub fn drain(&self, app: &mut BrowserApp, publisher: &StatePublisher) -> DrainOutcome {
        let mut outcome = DrainOutcome::default();
        for event in self.events.try_iter() {
            let SurfaceEvent { seq, tab_id, kind } = event;
            if !app.contains(tab_id) {
                log::trace!("discarding event for unknown tab {tab_id}");
                outcome.discarded += 1;
                continue;
            }
            if let Some(ui_kind) = TabEventKind::from_surface_event(&kind) {
                publisher.publish(seq, tab_id, ui_kind);
            }

            let is_active = app.active_tab_id() == Some(tab_id);
            match kind {
                SurfaceEventKind::LoadStart => {
                    app.update_tab(
                        tab_id,
                        TabDelta {
                            is_loading: Some(true),
                            ..TabDelta::default()
                        },
                    );
                }
                SurfaceEventKind::LoadStop {
                    title,
                    url,
                    can_go_back,
                    can_go_forward,
                } => {
                    app.update_tab(
                        tab_id,
                        TabDelta {
                            title: Some(title),
                            url: Some(url),
                            is_loading: Some(false),
                            can_go_back: Some(can_go_back),
                            can_go_forward: Some(can_go_forward),
                            ..TabDelta::default()
                        },
                    );
                    if is_active {
                        outcome.nav_state_dirty = true;
                    }
                }
                SurfaceEventKind::Navigated {
                    url,
                    can_go_back,
                    can_go_forward,
                } => {
                    app.update_tab(
                        tab_id,
                        TabDelta {
                            url: Some(url),
                            can_go_back: Some(can_go_back),
                            can_go_forward: Some(can_go_forward),
                            ..TabDelta::default()
                        },
                    );
                    if is_active {
                        outcome.nav_state_dirty = true;
                    }
                }
                SurfaceEventKind::TitleUpdated { title } => {
                    // An empty engine title keeps the existing one.
                    if !title.is_empty() {
                        app.update_tab(
                            tab_id,
                            TabDelta {
                                title: Some(title),
                                ..TabDelta::default()
                            },
                        );
                    }
                }
                SurfaceEventKind::FaviconUpdated { favicon_url } => {
                    app.update_tab(
                        tab_id,
                        TabDelta {
                            favicon: Some(favicon_url),
                            ..TabDelta::default()
                        },
                    );
                }
                SurfaceEventKind::PopupRequested { url } => {
                    outcome.follow_ups.push(BrowserIntent::OpenTab {
                        url,
                        background: true,
                    });
                }
            }
            outcome.applied += 1;
        }
        outcome
    }
}
