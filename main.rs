/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Interactive shell driving the session controller against the
//! headless reference engine. Real engine backends plug in behind the
//! [`WebEngine`] trait.
//!
//! [`WebEngine`]: tabshell::engine::WebEngine

use std::io::{self, BufRead, Write};
use std::rc::Rc;

use tabshell::app::{BrowserIntent, TabId};
use tabshell::headless::HeadlessEngine;
use tabshell::prefs::{self, cli_args};
use tabshell::shell::desktop::session::BrowserSession;

fn main() {
    env_logger::init();
    let args = cli_args().run();
    let preferences = prefs::load(&args);
    let initial_url = args
        .url
        .clone()
        .unwrap_or_else(|| preferences.homepage.clone());

    let engine = Rc::new(HeadlessEngine::new());
    let (mut session, _ui_rx) = BrowserSession::new(engine, preferences, &initial_url);
    session.pump();

    println!("tabshell {} (headless engine)", tabshell::VERSION);
    println!("commands: open [URL] | go INPUT | tab N | close [N] | back | forward | reload | tabs | quit");
    print_tabs(&session);

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }
        match parse_command(line, &session) {
            Some(intent) => {
                session.handle(intent);
                session.pump();
                print_tabs(&session);
            }
            None => {
                if line != "tabs" {
                    println!("unrecognized command: {line}");
                }
                print_tabs(&session);
            }
        }
    }
}

fn parse_command(line: &str, session: &BrowserSession) -> Option<BrowserIntent> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    match command {
        "open" => Some(BrowserIntent::OpenTab {
            url: if rest.is_empty() {
                "about:blank".to_string()
            } else {
                rest.to_string()
            },
            background: false,
        }),
        "go" if !rest.is_empty() => Some(BrowserIntent::SubmitLocation {
            input: rest.to_string(),
        }),
        "tab" => nth_tab(session, rest).map(|id| BrowserIntent::SelectTab { id }),
        "close" => {
            let id = if rest.is_empty() {
                session.app().active_tab_id()
            } else {
                nth_tab(session, rest)
            };
            id.map(|id| BrowserIntent::CloseTab { id })
        }
        "back" => Some(BrowserIntent::GoBack),
        "forward" => Some(BrowserIntent::GoForward),
        "reload" => Some(BrowserIntent::Reload),
        _ => None,
    }
}

fn nth_tab(session: &BrowserSession, index: &str) -> Option<TabId> {
    let index: usize = index.parse().ok()?;
    session.app().tab_ids().nth(index)
}

fn print_tabs(session: &BrowserSession) {
    let snapshot = session.ui_snapshot();
    for (index, tab) in snapshot.tabs.iter().enumerate() {
        let marker = if tab.is_active { '*' } else { ' ' };
        let spinner = if tab.is_loading { " [loading]" } else { "" };
        println!("{marker} {index}: {}  <{}>{spinner}", tab.title, tab.url);
    }
    let toolbar = &snapshot.toolbar;
    println!(
        "  location: {}  back:{} forward:{}",
        toolbar.location, toolbar.can_go_back, toolbar.can_go_forward
    );
}
