/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Content surface ownership.
//!
//! The pool holds exactly one engine surface per tab id and is the only
//! owner of surface handles and their event subscriptions. Navigation
//! calls on unknown ids are silent no-ops; a close racing an in-flight
//! command is expected and benign.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::app::TabId;
use crate::engine::{ContentSurface, EventSender, EventSubscription, SecurityConfig, WebEngine};

struct SurfaceEntry {
    // Declared before the surface so the subscription is released first
    // when the entry is dropped.
    _subscription: EventSubscription,
    surface: Rc<dyn ContentSurface>,
}

pub struct SurfacePool {
    engine: Rc<dyn WebEngine>,
    events: EventSender,
    entries: HashMap<TabId, SurfaceEntry>,
}

impl SurfacePool {
    pub fn new(engine: Rc<dyn WebEngine>, events: EventSender) -> Self {
        Self {
            engine,
            events,
            entries: HashMap::new(),
        }
    }

    /// Create the surface for a tab and start loading `url`. The surface
    /// is subscribed before the load begins so no lifecycle event is
    /// missed. The new surface is not yet attached.
    pub fn create(&mut self, tab_id: TabId, url: &str) {
        if self.entries.contains_key(&tab_id) {
            log::warn!("surface for tab {tab_id} already exists");
            return;
        }
        let surface = self
            .engine
            .create_surface(tab_id, SecurityConfig::default());
        let subscription = surface.subscribe(self.events.clone());
        surface.load(url);
        self.entries.insert(
            tab_id,
            SurfaceEntry {
                _subscription: subscription,
                surface,
            },
        );
        log::debug!("created surface for tab {tab_id}");
    }

    /// Release a tab's surface and its event subscription. Idempotent:
    /// unknown ids are a no-op.
    pub fn destroy(&mut self, tab_id: TabId) {
        if let Some(entry) = self.entries.remove(&tab_id) {
            entry.surface.close();
            log::debug!("destroyed surface for tab {tab_id}");
        }
    }

    pub fn navigate(&self, tab_id: TabId, url: &str) {
        if let Some(surface) = self.surface(tab_id) {
            surface.load(url);
        }
    }

    /// Capability-checked: a `go_back` without history is a no-op rather
    /// than undefined engine behavior.
    pub fn go_back(&self, tab_id: TabId) {
        if let Some(surface) = self.surface(tab_id)
            && surface.can_go_back()
        {
            surface.go_back();
        }
    }

    pub fn go_forward(&self, tab_id: TabId) {
        if let Some(surface) = self.surface(tab_id)
            && surface.can_go_forward()
        {
            surface.go_forward();
        }
    }

    pub fn reload(&self, tab_id: TabId) {
        if let Some(surface) = self.surface(tab_id) {
            surface.reload();
        }
    }

    pub fn surface(&self, tab_id: TabId) -> Option<&Rc<dyn ContentSurface>> {
        self.entries.get(&tab_id).map(|entry| &entry.surface)
    }

    pub fn surface_ids(&self) -> HashSet<TabId> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{EngineCall, HeadlessEngine};
    use crossbeam_channel::unbounded;

    fn pool_with_engine() -> (SurfacePool, HeadlessEngine) {
        let engine = HeadlessEngine::new();
        let (tx, _rx) = unbounded();
        let pool = SurfacePool::new(Rc::new(engine.clone()), tx);
        (pool, engine)
    }

    #[test]
    fn test_create_subscribes_then_loads() {
        let (mut pool, engine) = pool_with_engine();
        let tab_id = TabId::new();
        pool.create(tab_id, "https://example.com/");
        assert_eq!(engine.subscriber_count(), 1);
        assert!(engine.live_surface_ids().contains(&tab_id));
        assert!(
            engine
                .take_calls()
                .contains(&EngineCall::Load(tab_id, "https://example.com/".into()))
        );
    }

    #[test]
    fn test_duplicate_create_is_rejected() {
        let (mut pool, engine) = pool_with_engine();
        let tab_id = TabId::new();
        pool.create(tab_id, "https://one.example/");
        pool.create(tab_id, "https://two.example/");
        assert_eq!(pool.len(), 1);
        assert_eq!(engine.live_surface_ids().len(), 1);
    }

    #[test]
    fn test_destroy_releases_surface_and_subscription() {
        let (mut pool, engine) = pool_with_engine();
        let tab_id = TabId::new();
        pool.create(tab_id, "https://example.com/");
        pool.destroy(tab_id);
        assert_eq!(engine.subscriber_count(), 0);
        assert!(engine.live_surface_ids().is_empty());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_destroy_unknown_id_is_a_noop() {
        let (mut pool, _engine) = pool_with_engine();
        pool.destroy(TabId::new());
        let tab_id = TabId::new();
        pool.create(tab_id, "https://example.com/");
        pool.destroy(tab_id);
        pool.destroy(tab_id);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_navigation_on_unknown_id_is_a_noop() {
        let (pool, engine) = pool_with_engine();
        let ghost = TabId::new();
        pool.navigate(ghost, "https://example.com/");
        pool.go_back(ghost);
        pool.go_forward(ghost);
        pool.reload(ghost);
        assert!(engine.take_calls().is_empty());
    }

    #[test]
    fn test_go_back_without_history_is_suppressed() {
        let (mut pool, engine) = pool_with_engine();
        let tab_id = TabId::new();
        pool.create(tab_id, "https://example.com/");
        engine.take_calls();

        pool.go_back(tab_id);
        pool.go_forward(tab_id);
        assert!(engine.take_calls().is_empty());

        pool.navigate(tab_id, "https://next.example/");
        pool.go_back(tab_id);
        assert!(engine.take_calls().contains(&EngineCall::GoBack(tab_id)));
    }
}
