/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! End-to-end shell scenarios: a session controller driven against the
//! headless engine, checked through the public snapshot and the
//! engine's recorded call log.

use std::collections::HashSet;
use std::rc::Rc;

use crossbeam_channel::Receiver;

use tabshell::app::{BrowserIntent, TabId};
use tabshell::comms::TabEventMessage;
use tabshell::headless::{EngineCall, HeadlessEngine};
use tabshell::prefs::Preferences;
use tabshell::shell::desktop::lifecycle::visibility::VisibleSurface;
use tabshell::shell::desktop::session::BrowserSession;

const HOMEPAGE: &str = "https://home.example/";

fn start_session() -> (BrowserSession, HeadlessEngine, Receiver<String>) {
    let engine = HeadlessEngine::new();
    let (mut session, ui_rx) = BrowserSession::new(
        Rc::new(engine.clone()),
        Preferences::default(),
        HOMEPAGE,
    );
    session.pump();
    (session, engine, ui_rx)
}

fn tab_ids(session: &BrowserSession) -> Vec<TabId> {
    session.app().tab_ids().collect()
}

fn assert_tab_surface_correspondence(session: &BrowserSession, engine: &HeadlessEngine) {
    let tabs: HashSet<TabId> = session.app().tab_ids().collect();
    assert_eq!(session.pool().surface_ids(), tabs);
    assert_eq!(engine.live_surface_ids(), tabs);
}

#[test]
fn startup_opens_one_visible_tab_on_the_homepage() {
    let (session, engine, _ui_rx) = start_session();
    let ids = tab_ids(&session);
    assert_eq!(ids.len(), 1);
    assert_eq!(session.app().active_tab_id(), Some(ids[0]));
    assert_eq!(session.visible_surface(), VisibleSurface::One(ids[0]));
    assert_eq!(session.toolbar().location, HOMEPAGE);
    assert_tab_surface_correspondence(&session, &engine);
}

#[test]
fn opening_a_tab_appends_it_active_and_loading() {
    let (mut session, engine, _ui_rx) = start_session();
    let first = tab_ids(&session)[0];

    session.handle(BrowserIntent::OpenTab {
        url: "https://second.example/".into(),
        background: false,
    });
    let ids = tab_ids(&session);
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], first);
    let second = ids[1];
    assert_eq!(session.app().active_tab_id(), Some(second));
    assert!(session.app().get_tab(second).unwrap().is_loading);
    assert_tab_surface_correspondence(&session, &engine);

    session.pump();
    let tab = session.app().get_tab(second).unwrap();
    assert!(!tab.is_loading);
    assert_eq!(tab.url, "https://second.example/");
    assert_eq!(tab.title, "second.example");
    assert_eq!(session.visible_surface(), VisibleSurface::One(second));
}

#[test]
fn closing_the_active_first_tab_activates_its_replacement() {
    let (mut session, engine, _ui_rx) = start_session();
    for url in ["https://b.example/", "https://c.example/"] {
        session.handle(BrowserIntent::OpenTab {
            url: url.into(),
            background: false,
        });
    }
    session.pump();
    let ids = tab_ids(&session);
    let (a, b, c) = (ids[0], ids[1], ids[2]);

    session.handle(BrowserIntent::SelectTab { id: a });
    // Queue navigation events for the tab, then close it before they
    // are drained: the stale events must be discarded silently.
    session.handle(BrowserIntent::SubmitLocation {
        input: "https://late.example/".into(),
    });
    session.handle(BrowserIntent::CloseTab { id: a });
    let stats = session.pump();

    assert!(stats.discarded > 0);
    assert_eq!(tab_ids(&session), vec![b, c]);
    assert_eq!(session.app().active_tab_id(), Some(b));
    assert_eq!(session.visible_surface(), VisibleSurface::One(b));
    assert_tab_surface_correspondence(&session, &engine);
}

#[test]
fn close_is_idempotent_and_the_last_tab_is_protected() {
    let (mut session, engine, _ui_rx) = start_session();
    session.handle(BrowserIntent::OpenTab {
        url: "https://b.example/".into(),
        background: false,
    });
    session.pump();
    let ids = tab_ids(&session);

    session.handle(BrowserIntent::CloseTab { id: ids[1] });
    session.handle(BrowserIntent::CloseTab { id: ids[1] });
    session.pump();
    assert_eq!(tab_ids(&session), vec![ids[0]]);

    // The remaining tab cannot be closed.
    session.handle(BrowserIntent::CloseTab { id: ids[0] });
    session.pump();
    assert_eq!(session.app().tab_count(), 1);
    assert_eq!(session.visible_surface(), VisibleSurface::One(ids[0]));
    assert_tab_surface_correspondence(&session, &engine);
}

#[test]
fn submitted_domain_input_navigates_the_active_tab() {
    let (mut session, _engine, _ui_rx) = start_session();
    session.handle(BrowserIntent::SubmitLocation {
        input: "example.com".into(),
    });
    session.pump();

    let active = session.app().active_tab().unwrap();
    assert_eq!(active.url, "https://example.com/");
    assert_eq!(session.toolbar().location, "https://example.com/");
}

#[test]
fn submitted_free_text_becomes_an_encoded_search() {
    let (mut session, _engine, _ui_rx) = start_session();
    session.handle(BrowserIntent::SubmitLocation {
        input: "how to code".into(),
    });
    session.pump();

    let url = &session.app().active_tab().unwrap().url;
    assert!(url.starts_with("https://www.google.com/search?q="));
    assert!(url.contains("how+to+code"));
    assert!(!url.contains(' '));
}

#[test]
fn load_stop_capability_reaches_the_toolbar_without_user_action() {
    let (mut session, _engine, _ui_rx) = start_session();
    assert!(!session.toolbar().can_go_back);

    session.handle(BrowserIntent::SubmitLocation {
        input: "https://next.example/".into(),
    });
    session.pump();
    assert!(session.toolbar().can_go_back);
    assert!(!session.toolbar().can_go_forward);

    session.handle(BrowserIntent::GoBack);
    session.pump();
    assert!(!session.toolbar().can_go_back);
    assert!(session.toolbar().can_go_forward);
    assert_eq!(session.app().active_tab().unwrap().url, HOMEPAGE);
}

#[test]
fn go_back_without_history_makes_no_engine_call() {
    let (mut session, engine, _ui_rx) = start_session();
    engine.take_calls();
    session.handle(BrowserIntent::GoBack);
    session.handle(BrowserIntent::GoForward);
    session.pump();
    assert!(engine.take_calls().is_empty());
}

#[test]
fn reselecting_the_active_tab_makes_no_engine_calls() {
    let (mut session, engine, _ui_rx) = start_session();
    let active = session.app().active_tab_id().unwrap();
    engine.take_calls();

    session.handle(BrowserIntent::SelectTab { id: active });
    session.handle(BrowserIntent::SelectTab { id: active });
    session.pump();
    assert!(engine.take_calls().is_empty());
}

#[test]
fn switching_tabs_detaches_before_attaching() {
    let (mut session, engine, _ui_rx) = start_session();
    session.handle(BrowserIntent::OpenTab {
        url: "https://b.example/".into(),
        background: false,
    });
    session.pump();
    let ids = tab_ids(&session);
    engine.take_calls();

    session.handle(BrowserIntent::SelectTab { id: ids[0] });
    let calls = engine.take_calls();
    assert_eq!(calls[0], EngineCall::Detach(ids[1]));
    assert_eq!(calls[1], EngineCall::Attach(ids[0]));
}

#[test]
fn popup_requests_open_background_tabs() {
    let (mut session, engine, _ui_rx) = start_session();
    let opener = session.app().active_tab_id().unwrap();

    engine.request_popup(opener, "https://popup.example/");
    session.pump();

    let ids = tab_ids(&session);
    assert_eq!(ids.len(), 2);
    assert_eq!(session.app().active_tab_id(), Some(opener));
    assert_eq!(session.visible_surface(), VisibleSurface::One(opener));
    let popup = session.app().get_tab(ids[1]).unwrap();
    assert_eq!(popup.url, "https://popup.example/");
    assert_tab_surface_correspondence(&session, &engine);
}

#[test]
fn window_resize_relays_bounds_to_the_visible_surface_only() {
    let (mut session, engine, _ui_rx) = start_session();
    session.handle(BrowserIntent::OpenTab {
        url: "https://b.example/".into(),
        background: false,
    });
    session.pump();
    let active = session.app().active_tab_id().unwrap();
    engine.take_calls();

    session.handle(BrowserIntent::WindowResized {
        width: 800,
        height: 600,
    });
    let calls = engine.take_calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0], EngineCall::SetBounds(id, _) if id == active));
}

#[test]
fn failed_loads_stop_quietly_with_the_url_unchanged() {
    let (mut session, _engine, _ui_rx) = start_session();
    session.handle(BrowserIntent::SubmitLocation {
        input: "https://down.invalid/".into(),
    });
    session.pump();

    let active = session.app().active_tab().unwrap();
    assert_eq!(active.url, HOMEPAGE);
    assert!(!active.is_loading);
}

#[test]
fn presentation_channel_receives_ordered_tab_lifecycle_messages() {
    let (mut session, _engine, ui_rx) = start_session();
    let active = session.app().active_tab_id().unwrap();
    session.handle(BrowserIntent::SubmitLocation {
        input: "https://next.example/".into(),
    });
    session.pump();

    let messages: Vec<TabEventMessage> = ui_rx
        .try_iter()
        .map(|payload| serde_json::from_str(&payload).unwrap())
        .collect();
    assert!(!messages.is_empty());

    let for_tab: Vec<&TabEventMessage> = messages
        .iter()
        .filter(|message| message.tab_id == active)
        .collect();
    let seqs: Vec<u64> = for_tab.iter().map(|message| message.seq).collect();
    let mut sorted = seqs.clone();
    sorted.sort_unstable();
    assert_eq!(seqs, sorted);

    let payloads: Vec<String> = for_tab
        .iter()
        .map(|message| serde_json::to_string(&message.kind).unwrap())
        .collect();
    let start = payloads
        .iter()
        .position(|kind| kind.contains("tab-loading-start"));
    let stop = payloads
        .iter()
        .position(|kind| kind.contains("tab-loading-stop"));
    assert!(start.unwrap() < stop.unwrap());
}
