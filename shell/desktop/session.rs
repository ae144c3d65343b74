/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The session controller: the single serialization point where user
//! intents and drained surface events mutate shell state.
//!
//! Tab records and surfaces are created and destroyed together here, so
//! the registry's tab set and the pool's surface set stay 1:1 at every
//! quiescent point. All state lives on one control thread; the engine's
//! own concurrency is only observable through the event channel drained
//! by [`pump`].
//!
//! [`pump`]: BrowserSession::pump

use std::rc::Rc;

use crossbeam_channel::{Receiver, unbounded};
use euclid::default::Size2D;

use crate::app::{BrowserApp, BrowserIntent, TabId};
use crate::comms::StatePublisher;
use crate::engine::WebEngine;
use crate::prefs::Preferences;
use crate::shell::desktop::lifecycle::event_relay::EventRelay;
use crate::shell::desktop::lifecycle::surface_pool::SurfacePool;
use crate::shell::desktop::lifecycle::visibility::{VisibilityCoordinator, VisibleSurface};
use crate::shell::desktop::ui::snapshot::{self, UiSnapshot};
use crate::shell::desktop::ui::toolbar::NavigationToolbar;

/// Aggregate result of one [`BrowserSession::pump`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PumpStats {
    pub applied: usize,
    pub discarded: usize,
}

pub struct BrowserSession {
    app: BrowserApp,
    pool: SurfacePool,
    visibility: VisibilityCoordinator,
    relay: EventRelay,
    toolbar: NavigationToolbar,
    publisher: StatePublisher,
    prefs: Preferences,
}

impl BrowserSession {
    /// Build a session with one initial tab open on `initial_url`.
    /// Returns the presentation-side receiver for the coordinator's
    /// push channel.
    pub fn new(
        engine: Rc<dyn WebEngine>,
        prefs: Preferences,
        initial_url: &str,
    ) -> (Self, Receiver<String>) {
        let (event_tx, event_rx) = unbounded();
        let (publisher, ui_rx) = StatePublisher::channel();
        let mut session = Self {
            app: BrowserApp::new(),
            pool: SurfacePool::new(engine, event_tx),
            visibility: VisibilityCoordinator::new(Size2D::new(
                prefs.window_width,
                prefs.window_height,
            )),
            relay: EventRelay::new(event_rx),
            toolbar: NavigationToolbar::new(),
            publisher,
            prefs,
        };
        session.open_tab(initial_url, false);
        (session, ui_rx)
    }

    pub fn handle(&mut self, intent: BrowserIntent) {
        match intent {
            BrowserIntent::OpenTab { url, background } => {
                self.open_tab(&url, background);
            }
            BrowserIntent::CloseTab { id } => self.close_tab(id),
            BrowserIntent::SelectTab { id } => self.select_tab(id),
            BrowserIntent::SubmitLocation { input } => self.submit_location(&input),
            BrowserIntent::GoBack => {
                if let Some(active) = self.app.active_tab_id() {
                    self.pool.go_back(active);
                }
            }
            BrowserIntent::GoForward => {
                if let Some(active) = self.app.active_tab_id() {
                    self.pool.go_forward(active);
                }
            }
            BrowserIntent::Reload => {
                if let Some(active) = self.app.active_tab_id() {
                    self.pool.reload(active);
                }
            }
            BrowserIntent::WindowResized { width, height } => {
                self.visibility
                    .resize(Size2D::new(width, height), &self.pool);
            }
        }
    }

    /// Drain surface events until quiescent, applying any follow-up
    /// intents they produce (popup opens), then refresh the toolbar
    /// projection from the live active surface.
    pub fn pump(&mut self) -> PumpStats {
        let mut stats = PumpStats::default();
        let mut dirty = false;
        loop {
            let outcome = self.relay.drain(&mut self.app, &self.publisher);
            stats.applied += outcome.applied;
            stats.discarded += outcome.discarded;
            dirty |= outcome.nav_state_dirty || outcome.applied > 0;
            let quiescent = outcome.applied == 0
                && outcome.discarded == 0
                && outcome.follow_ups.is_empty();
            for follow_up in outcome.follow_ups {
                self.handle(follow_up);
            }
            if quiescent {
                break;
            }
        }
        if dirty {
            self.toolbar.sync(&self.app, &self.pool);
        }
        stats
    }

    fn open_tab(&mut self, url: &str, background: bool) -> TabId {
        let id = self.app.create_tab(url, !background);
        self.pool.create(id, url);
        if self.app.active_tab_id() == Some(id) {
            self.visibility.show(id, &self.pool);
            self.toolbar.sync(&self.app, &self.pool);
        }
        id
    }

    fn close_tab(&mut self, id: TabId) {
        // The registry validates first: closing the last tab or an
        // unknown id touches nothing, not even the engine.
        let Some(outcome) = self.app.close_tab(id) else {
            return;
        };
        self.visibility.hide(id, &self.pool);
        self.pool.destroy(id);
        if let Some(next) = outcome.activated {
            self.visibility.show(next, &self.pool);
        }
        self.toolbar.sync(&self.app, &self.pool);
    }

    fn select_tab(&mut self, id: TabId) {
        if self.app.set_active(id) {
            self.visibility.show(id, &self.pool);
            self.toolbar.sync(&self.app, &self.pool);
        }
    }

    fn submit_location(&mut self, input: &str) {
        let Some(url) = self.toolbar.submit(input, &self.prefs.search_page) else {
            return;
        };
        if let Some(active) = self.app.active_tab_id() {
            self.pool.navigate(active, url.as_str());
        }
    }

    pub fn app(&self) -> &BrowserApp {
        &self.app
    }

    pub fn toolbar(&self) -> &NavigationToolbar {
        &self.toolbar
    }

    pub fn pool(&self) -> &SurfacePool {
        &self.pool
    }

    pub fn visible_surface(&self) -> VisibleSurface {
        self.visibility.visible()
    }

    pub fn ui_snapshot(&self) -> UiSnapshot {
        snapshot::snapshot(&self.app, &self.toolbar)
    }
}
