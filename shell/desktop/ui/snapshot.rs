/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Read-only presentation snapshot.
//!
//! The tab strip and toolbar render from this value alone; they mutate
//! shell state only by emitting [`BrowserIntent`]s back at the session.
//!
//! [`BrowserIntent`]: crate::app::BrowserIntent

use serde::Serialize;

use crate::app::{BrowserApp, TabId};
use crate::shell::desktop::ui::toolbar::NavigationToolbar;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabView {
    pub id: TabId,
    pub title: String,
    pub url: String,
    pub is_loading: bool,
    pub favicon: Option<String>,
    pub is_active: bool,
    /// The strip hides the close button on the last remaining tab.
    pub can_close: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolbarView {
    pub location: String,
    pub is_loading: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiSnapshot {
    pub tabs: Vec<TabView>,
    pub active_tab_id: Option<TabId>,
    pub toolbar: ToolbarView,
}

pub fn snapshot(app: &BrowserApp, toolbar: &NavigationToolbar) -> UiSnapshot {
    let active = app.active_tab_id();
    let can_close = app.tab_count() > 1;
    UiSnapshot {
        tabs: app
            .tabs()
            .map(|tab| TabView {
                id: tab.id,
                title: tab.title.clone(),
                url: tab.url.clone(),
                is_loading: tab.is_loading,
                favicon: tab.favicon.clone(),
                is_active: active == Some(tab.id),
                can_close,
            })
            .collect(),
        active_tab_id: active,
        toolbar: ToolbarView {
            location: toolbar.location.clone(),
            is_loading: toolbar.is_loading,
            can_go_back: toolbar.can_go_back,
            can_go_forward: toolbar.can_go_forward,
        },
    }
}
