/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Navigation toolbar state.
//!
//! The toolbar's can-go-back/forward flags are cached projections for
//! the UI; the authoritative answer is always the live capability query
//! on the active surface, re-asked after every navigation-affecting
//! event. The location field tracks the active tab's URL except while
//! the user is editing it (`location_dirty`).

use url::Url;

use crate::app::BrowserApp;
use crate::parser::location_bar_input_to_url;
use crate::shell::desktop::lifecycle::surface_pool::SurfacePool;

#[derive(Debug, Default)]
pub struct NavigationToolbar {
    pub location: String,
    pub location_dirty: bool,
    pub is_loading: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

impl NavigationToolbar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute every toolbar field from the registry and the active
    /// surface. Returns whether anything changed.
    pub fn sync(&mut self, app: &BrowserApp, pool: &SurfacePool) -> bool {
        let location_changed = self.update_location(app);
        let loading_changed = self.update_load_status(app);
        let capability_changed = self.update_can_go_back_and_forward(app, pool);
        location_changed || loading_changed || capability_changed
    }

    fn update_location(&mut self, app: &BrowserApp) -> bool {
        if self.location_dirty {
            return false;
        }
        match app.active_tab() {
            Some(tab) if tab.url != self.location => {
                self.location = tab.url.clone();
                true
            }
            _ => false,
        }
    }

    fn update_load_status(&mut self, app: &BrowserApp) -> bool {
        let is_loading = app.active_tab().is_some_and(|tab| tab.is_loading);
        let changed = self.is_loading != is_loading;
        self.is_loading = is_loading;
        if changed {
            self.location_dirty = false;
        }
        changed
    }

    fn update_can_go_back_and_forward(&mut self, app: &BrowserApp, pool: &SurfacePool) -> bool {
        let (can_go_back, can_go_forward) = app
            .active_tab_id()
            .and_then(|id| pool.surface(id))
            .map(|surface| (surface.can_go_back(), surface.can_go_forward()))
            .unwrap_or((false, false));

        let changed = self.can_go_back != can_go_back || self.can_go_forward != can_go_forward;
        self.can_go_back = can_go_back;
        self.can_go_forward = can_go_forward;
        changed
    }

    /// Normalize submitted location-bar text. On success the field is
    /// marked clean; unparseable input keeps the user's text for
    /// correction.
    pub fn submit(&mut self, input: &str, search_page: &str) -> Option<Url> {
        match location_bar_input_to_url(input, search_page) {
            Some(url) => {
                self.location = url.to_string();
                self.location_dirty = false;
                Some(url)
            }
            None => {
                log::warn!("failed to parse location: {input}");
                None
            }
        }
    }
}
