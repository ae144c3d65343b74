/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The at-most-one-visible-surface state machine.
//!
//! The shell keeps a single surface mounted: switching tabs detaches the
//! old surface, attaches the new one, and re-applies layout bounds in
//! one transition, so no frame shows zero or two surfaces. Inactive
//! surfaces are never bounds-updated; a window resize touches only the
//! visible one.

use euclid::default::{Point2D, Rect, Size2D};

use crate::app::TabId;
use crate::shell::desktop::lifecycle::surface_pool::SurfacePool;

pub const TAB_STRIP_HEIGHT: i32 = 40;
pub const TOOLBAR_HEIGHT: i32 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleSurface {
    None,
    One(TabId),
}

pub struct VisibilityCoordinator {
    visible: VisibleSurface,
    window_size: Size2D<i32>,
}

impl VisibilityCoordinator {
    pub fn new(window_size: Size2D<i32>) -> Self {
        Self {
            visible: VisibleSurface::None,
            window_size,
        }
    }

    pub fn visible(&self) -> VisibleSurface {
        self.visible
    }

    /// Window area left for content after the fixed-height chrome
    /// regions (tab strip plus toolbar).
    pub fn content_bounds(&self) -> Rect<i32> {
        let chrome = TAB_STRIP_HEIGHT + TOOLBAR_HEIGHT;
        Rect::new(
            Point2D::new(0, chrome),
            Size2D::new(
                self.window_size.width.max(0),
                (self.window_size.height - chrome).max(0),
            ),
        )
    }

    /// Make a tab's surface the visible one: detach the previous surface
    /// first, then attach and lay out the new one. Re-showing the
    /// already-visible tab makes no engine calls.
    pub fn show(&mut self, tab_id: TabId, pool: &SurfacePool) {
        if self.visible == VisibleSurface::One(tab_id) {
            return;
        }
        let Some(surface) = pool.surface(tab_id) else {
            log::warn!("cannot show tab {tab_id}: no surface");
            return;
        };
        if let VisibleSurface::One(previous) = self.visible
            && let Some(previous_surface) = pool.surface(previous)
        {
            previous_surface.detach();
        }
        surface.attach();
        surface.set_bounds(self.content_bounds());
        self.visible = VisibleSurface::One(tab_id);
        log::trace!("visible surface is now {tab_id}");
    }

    /// Detach a tab's surface if it is the visible one. Used on close of
    /// the active tab; the caller immediately shows the replacement.
    pub fn hide(&mut self, tab_id: TabId, pool: &SurfacePool) {
        if self.visible != VisibleSurface::One(tab_id) {
            return;
        }
        if let Some(surface) = pool.surface(tab_id) {
            surface.detach();
        }
        self.visible = VisibleSurface::None;
    }

    /// Apply a new window size to whichever surface is visible.
    pub fn resize(&mut self, window_size: Size2D<i32>, pool: &SurfacePool) {
        self.window_size = window_size;
        if let VisibleSurface::One(tab_id) = self.visible
            && let Some(surface) = pool.surface(tab_id)
        {
            surface.set_bounds(self.content_bounds());
        }
    }
}
