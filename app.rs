/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Application state management for the browser shell.
//!
//! [`BrowserApp`] is the tab registry: the ordered set of tabs plus the
//! single active-tab identity. It owns no engine state; surface effects
//! are orchestrated by the session controller, and surface lifecycle
//! events reach this registry only through [`update_tab`].
//!
//! [`update_tab`]: BrowserApp::update_tab

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title shown for a tab until its first title event arrives.
pub const PLACEHOLDER_TITLE: &str = "New Tab";

/// Opaque tab identity. Stable for the tab's lifetime, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One navigable browsing session as exposed to the tab strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tab {
    pub id: TabId,
    pub title: String,
    pub url: String,
    pub is_loading: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub favicon: Option<String>,
}

impl Tab {
    fn new(id: TabId, url: &str) -> Self {
        Self {
            id,
            title: PLACEHOLDER_TITLE.to_string(),
            url: url.to_string(),
            is_loading: true,
            can_go_back: false,
            can_go_forward: false,
            favicon: None,
        }
    }
}

/// Partial tab update applied by the event relay. `None` fields keep the
/// current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabDelta {
    pub title: Option<String>,
    pub url: Option<String>,
    pub is_loading: Option<bool>,
    pub can_go_back: Option<bool>,
    pub can_go_forward: Option<bool>,
    pub favicon: Option<String>,
}

/// User intents emitted by the presentation layer and applied by the
/// session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserIntent {
    OpenTab { url: String, background: bool },
    CloseTab { id: TabId },
    SelectTab { id: TabId },
    SubmitLocation { input: String },
    GoBack,
    GoForward,
    Reload,
    WindowResized { width: i32, height: i32 },
}

/// Outcome of a successful [`BrowserApp::close_tab`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosedTab {
    /// Replacement tab activated by the close, when the closed tab was
    /// the active one.
    pub activated: Option<TabId>,
}

/// The tab registry. Tabs are held in creation order and addressable by
/// id; exactly one tab is active whenever the registry is non-empty.
#[derive(Debug, Default)]
pub struct BrowserApp {
    tabs: HashMap<TabId, Tab>,
    order: Vec<TabId>,
    active: Option<TabId>,
}

impl BrowserApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new tab at the end of the strip, loading the given URL.
    /// The tab starts with the placeholder title and `is_loading = true`.
    /// When `activate` is set the new tab becomes the active one
    /// (popups open in the background and leave the active tab alone).
    pub fn create_tab(&mut self, url: &str, activate: bool) -> TabId {
        let id = TabId::new();
        self.tabs.insert(id, Tab::new(id, url));
        self.order.push(id);
        if activate || self.active.is_none() {
            self.active = Some(id);
        }
        log::debug!("created tab {id} for {url}");
        self.debug_assert_invariants();
        id
    }

    /// Remove a tab. Returns `None` without touching any state when the
    /// id is unknown or the tab is the last one left (the strip never
    /// goes empty). When the closed tab was active, the replacement is
    /// the tab now occupying its former position, else the previous
    /// position, else the first remaining tab.
    pub fn close_tab(&mut self, id: TabId) -> Option<ClosedTab> {
        let index = self.order.iter().position(|existing| *existing == id)?;
        if self.order.len() == 1 {
            log::debug!("refusing to close the last tab {id}");
            return None;
        }
        self.order.remove(index);
        self.tabs.remove(&id);

        let activated = if self.active == Some(id) {
            let replacement = self
                .order
                .get(index)
                .or_else(|| index.checked_sub(1).and_then(|prev| self.order.get(prev)))
                .or_else(|| self.order.first())
                .copied();
            self.active = replacement;
            replacement
        } else {
            None
        };
        log::debug!("closed tab {id}, activated {activated:?}");
        self.debug_assert_invariants();
        Some(ClosedTab { activated })
    }

    /// Make a tab active. Returns `false` (a no-op) when the id is
    /// unknown or already active, so callers can skip redundant
    /// detach/attach engine calls.
    pub fn set_active(&mut self, id: TabId) -> bool {
        if self.active == Some(id) || !self.tabs.contains_key(&id) {
            return false;
        }
        self.active = Some(id);
        self.debug_assert_invariants();
        true
    }

    /// Apply a partial update from the event relay. Unknown ids are a
    /// silent no-op: a surface event may race the close of its tab.
    pub fn update_tab(&mut self, id: TabId, delta: TabDelta) -> bool {
        let Some(tab) = self.tabs.get_mut(&id) else {
            log::trace!("dropping update for unknown tab {id}");
            return false;
        };
        if let Some(title) = delta.title {
            tab.title = title;
        }
        if let Some(url) = delta.url {
            tab.url = url;
        }
        if let Some(is_loading) = delta.is_loading {
            tab.is_loading = is_loading;
        }
        if let Some(can_go_back) = delta.can_go_back {
            tab.can_go_back = can_go_back;
        }
        if let Some(can_go_forward) = delta.can_go_forward {
            tab.can_go_forward = can_go_forward;
        }
        if let Some(favicon) = delta.favicon {
            tab.favicon = Some(favicon);
        }
        true
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.and_then(|id| self.tabs.get(&id))
    }

    pub fn get_tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.get(&id)
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.tabs.contains_key(&id)
    }

    /// Tabs in creation order.
    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.order.iter().filter_map(|id| self.tabs.get(id))
    }

    pub fn tab_ids(&self) -> impl Iterator<Item = TabId> + '_ {
        self.order.iter().copied()
    }

    pub fn tab_count(&self) -> usize {
        self.order.len()
    }

    fn debug_assert_invariants(&self) {
        debug_assert_eq!(self.order.len(), self.tabs.len());
        debug_assert_eq!(self.active.is_some(), !self.order.is_empty());
        if let Some(active) = self.active {
            debug_assert!(self.tabs.contains_key(&active));
        }
    }
}
