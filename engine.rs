/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The opaque embedded-browser engine boundary.
//!
//! The shell never sees engine internals: it creates surfaces, issues
//! fire-and-forget navigation commands, makes point-in-time capability
//! queries, and observes asynchronous [`SurfaceEvent`]s. All engine
//! concurrency stays behind this boundary; events are delivered on a
//! channel and drained on the shell's single control thread.

use std::rc::Rc;

use crossbeam_channel::Sender;
use euclid::default::Rect;

use crate::app::TabId;

/// How a surface responds to script-initiated window-open requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupPolicy {
    /// Republish the request as [`SurfaceEventKind::PopupRequested`] so
    /// the shell opens it as a new background tab.
    OpenAsTab,
    /// Drop the request.
    Deny,
}

/// Security posture for a new content surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Scripts run in an isolated context, not the shell's.
    pub isolated_context: bool,
    /// Whether page scripts get an elevated-privilege bridge. Always
    /// `false` for web content surfaces.
    pub privileged_bridge: bool,
    pub popup_policy: PopupPolicy,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            isolated_context: true,
            privileged_bridge: false,
            popup_policy: PopupPolicy::OpenAsTab,
        }
    }
}

/// Asynchronous lifecycle notification from a content surface.
///
/// `seq` comes from an engine-global counter so cross-surface ordering
/// is deterministic when events are inspected later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceEvent {
    pub seq: u64,
    pub tab_id: TabId,
    pub kind: SurfaceEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEventKind {
    LoadStart,
    LoadStop {
        title: String,
        url: String,
        can_go_back: bool,
        can_go_forward: bool,
    },
    Navigated {
        url: String,
        can_go_back: bool,
        can_go_forward: bool,
    },
    TitleUpdated {
        title: String,
    },
    FaviconUpdated {
        favicon_url: String,
    },
    /// Emitted under [`PopupPolicy::OpenAsTab`] when page script asks
    /// for a new window.
    PopupRequested {
        url: String,
    },
}

pub type EventSender = Sender<SurfaceEvent>;

/// Drop guard for a surface's event subscription.
///
/// Releasing on drop ties subscription lifetime to the pool entry that
/// owns it, so no destroy path can leak a listener.
pub struct EventSubscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl EventSubscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSubscription")
            .field("live", &self.release.is_some())
            .finish()
    }
}

/// One renderable, navigable content surface, keyed 1:1 by tab id.
///
/// Navigation calls are fire-and-forget; their results arrive later as
/// [`SurfaceEvent`]s. Capability and state queries are synchronous and
/// point-in-time. A load failure is never a synchronous error: loading
/// simply stops with the URL unchanged.
pub trait ContentSurface {
    fn load(&self, url: &str);
    fn go_back(&self);
    fn go_forward(&self);
    fn reload(&self);

    fn can_go_back(&self) -> bool;
    fn can_go_forward(&self) -> bool;
    fn title(&self) -> String;
    fn url(&self) -> String;
    fn is_loading(&self) -> bool;

    /// Attach to the window's content region. The surface stays
    /// invisible until attached.
    fn attach(&self);
    fn detach(&self);
    fn set_bounds(&self, bounds: Rect<i32>);

    /// Route this surface's lifecycle events to `events` until the
    /// returned guard is dropped.
    fn subscribe(&self, events: EventSender) -> EventSubscription;

    /// Release engine resources. Events stop after this call.
    fn close(&self);
}

/// Factory half of the engine boundary.
pub trait WebEngine {
    fn create_surface(&self, tab_id: TabId, config: SecurityConfig) -> Rc<dyn ContentSurface>;
}
