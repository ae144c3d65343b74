/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Deterministic in-process engine.
//!
//! Stands in for a real embedded-browser engine behind the
//! [`WebEngine`]/[`ContentSurface`] boundary: every navigation completes
//! immediately by queueing its full lifecycle event cycle onto the event
//! channel, where the shell drains it later exactly as it would real
//! asynchronous engine events. Hosts whose name ends in `.invalid` are
//! treated as unreachable, loading stops with the URL unchanged.
//!
//! The engine records every call it receives so tests can assert on
//! attach/detach ordering and redundant-call avoidance.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use euclid::default::Rect;
use url::Url;

use crate::app::TabId;
use crate::engine::{
    ContentSurface, EventSender, EventSubscription, PopupPolicy, SecurityConfig, SurfaceEvent,
    SurfaceEventKind, WebEngine,
};

/// One engine call as observed at the boundary, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Create(TabId),
    Load(TabId, String),
    GoBack(TabId),
    GoForward(TabId),
    Reload(TabId),
    Attach(TabId),
    Detach(TabId),
    SetBounds(TabId, Rect<i32>),
    Close(TabId),
}

#[derive(Default)]
struct EngineState {
    seq: u64,
    subscribers: HashMap<TabId, EventSender>,
    live: HashSet<TabId>,
    policies: HashMap<TabId, PopupPolicy>,
    calls: Vec<EngineCall>,
}

impl EngineState {
    fn emit(&mut self, tab_id: TabId, kind: SurfaceEventKind) {
        self.seq += 1;
        if let Some(tx) = self.subscribers.get(&tab_id) {
            let _ = tx.send(SurfaceEvent {
                seq: self.seq,
                tab_id,
                kind,
            });
        }
    }
}

#[derive(Clone, Default)]
pub struct HeadlessEngine {
    state: Rc<RefCell<EngineState>>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of surfaces created and not yet closed.
    pub fn live_surface_ids(&self) -> HashSet<TabId> {
        self.state.borrow().live.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().subscribers.len()
    }

    /// Drain the recorded call log.
    pub fn take_calls(&self) -> Vec<EngineCall> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    /// Simulate page script on `parent`'s surface requesting a popup.
    pub fn request_popup(&self, parent: TabId, url: &str) {
        let mut state = self.state.borrow_mut();
        match state.policies.get(&parent).copied() {
            Some(PopupPolicy::OpenAsTab) => {
                state.emit(
                    parent,
                    SurfaceEventKind::PopupRequested {
                        url: url.to_string(),
                    },
                );
            }
            Some(PopupPolicy::Deny) => {
                log::debug!("denying popup request from {parent} for {url}");
            }
            None => log::trace!("popup request from unknown surface {parent}"),
        }
    }
}

impl WebEngine for HeadlessEngine {
    fn create_surface(&self, tab_id: TabId, config: SecurityConfig) -> Rc<dyn ContentSurface> {
        let mut state = self.state.borrow_mut();
        state.live.insert(tab_id);
        state.policies.insert(tab_id, config.popup_policy);
        state.calls.push(EngineCall::Create(tab_id));
        Rc::new(HeadlessSurface {
            tab_id,
            engine: Rc::clone(&self.state),
            state: RefCell::new(SurfaceState::default()),
        })
    }
}

#[derive(Default)]
struct SurfaceState {
    history: Vec<String>,
    index: usize,
    title: String,
    attached: bool,
    closed: bool,
}

struct HeadlessSurface {
    tab_id: TabId,
    engine: Rc<RefCell<EngineState>>,
    state: RefCell<SurfaceState>,
}

fn title_for(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

fn favicon_for(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(format!("{}://{host}/favicon.ico", parsed.scheme()))
}

fn is_unreachable(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.ends_with(".invalid")))
        .unwrap_or(false)
}

impl HeadlessSurface {
    fn record(&self, call: EngineCall) {
        self.engine.borrow_mut().calls.push(call);
    }

    fn emit(&self, kind: SurfaceEventKind) {
        self.engine.borrow_mut().emit(self.tab_id, kind);
    }

    fn current_url(&self) -> String {
        let state = self.state.borrow();
        state
            .history
            .get(state.index)
            .cloned()
            .unwrap_or_else(|| "about:blank".to_string())
    }

    /// Queue the event cycle for arriving at the current history entry.
    fn emit_arrival_cycle(&self) {
        let (url, title, can_go_back, can_go_forward) = {
            let state = self.state.borrow();
            (
                self.current_url(),
                state.title.clone(),
                state.index > 0,
                state.index + 1 < state.history.len(),
            )
        };
        self.emit(SurfaceEventKind::LoadStart);
        self.emit(SurfaceEventKind::Navigated {
            url: url.clone(),
            can_go_back,
            can_go_forward,
        });
        self.emit(SurfaceEventKind::TitleUpdated {
            title: title.clone(),
        });
        if let Some(favicon_url) = favicon_for(&url) {
            self.emit(SurfaceEventKind::FaviconUpdated { favicon_url });
        }
        self.emit(SurfaceEventKind::LoadStop {
            title,
            url,
            can_go_back,
            can_go_forward,
        });
    }

    fn emit_failed_load_cycle(&self) {
        let (url, title, can_go_back, can_go_forward) = {
            let state = self.state.borrow();
            (
                self.current_url(),
                state.title.clone(),
                state.index > 0,
                state.index + 1 < state.history.len(),
            )
        };
        self.emit(SurfaceEventKind::LoadStart);
        // Loading stops with URL and history unchanged.
        self.emit(SurfaceEventKind::LoadStop {
            title,
            url,
            can_go_back,
            can_go_forward,
        });
    }
}

impl ContentSurface for HeadlessSurface {
    fn load(&self, url: &str) {
        if self.state.borrow().closed {
            return;
        }
        self.record(EngineCall::Load(self.tab_id, url.to_string()));
        if is_unreachable(url) {
            self.emit_failed_load_cycle();
            return;
        }
        {
            let mut state = self.state.borrow_mut();
            if !state.history.is_empty() {
                let keep = state.index + 1;
                state.history.truncate(keep);
            }
            state.history.push(url.to_string());
            state.index = state.history.len() - 1;
            state.title = title_for(url);
        }
        self.emit_arrival_cycle();
    }

    fn go_back(&self) {
        if self.state.borrow().closed || !self.can_go_back() {
            return;
        }
        self.record(EngineCall::GoBack(self.tab_id));
        {
            let mut state = self.state.borrow_mut();
            state.index -= 1;
            let url = state.history[state.index].clone();
            state.title = title_for(&url);
        }
        self.emit_arrival_cycle();
    }

    fn go_forward(&self) {
        if self.state.borrow().closed || !self.can_go_forward() {
            return;
        }
        self.record(EngineCall::GoForward(self.tab_id));
        {
            let mut state = self.state.borrow_mut();
            state.index += 1;
            let url = state.history[state.index].clone();
            state.title = title_for(&url);
        }
        self.emit_arrival_cycle();
    }

    fn reload(&self) {
        if self.state.borrow().closed {
            return;
        }
        self.record(EngineCall::Reload(self.tab_id));
        self.emit_arrival_cycle();
    }

    fn can_go_back(&self) -> bool {
        self.state.borrow().index > 0
    }

    fn can_go_forward(&self) -> bool {
        let state = self.state.borrow();
        state.index + 1 < state.history.len()
    }

    fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    fn url(&self) -> String {
        self.current_url()
    }

    fn is_loading(&self) -> bool {
        // Loads complete within the emitted cycle.
        false
    }

    fn attach(&self) {
        self.state.borrow_mut().attached = true;
        self.record(EngineCall::Attach(self.tab_id));
    }

    fn detach(&self) {
        self.state.borrow_mut().attached = false;
        self.record(EngineCall::Detach(self.tab_id));
    }

    fn set_bounds(&self, bounds: Rect<i32>) {
        self.record(EngineCall::SetBounds(self.tab_id, bounds));
    }

    fn subscribe(&self, events: EventSender) -> EventSubscription {
        self.engine
            .borrow_mut()
            .subscribers
            .insert(self.tab_id, events);
        let engine = Rc::clone(&self.engine);
        let tab_id = self.tab_id;
        EventSubscription::new(move || {
            engine.borrow_mut().subscribers.remove(&tab_id);
        })
    }

    fn close(&self) {
        let mut state = self.state.borrow_mut();
        if state.closed {
            return;
        }
        state.closed = true;
        let mut engine = self.engine.borrow_mut();
        engine.live.remove(&self.tab_id);
        engine.calls.push(EngineCall::Close(self.tab_id));
    }
}
