//! Property-based tests for the App state machine.
//!
//! Arbitrary key and session event sequences must never break the page
//! stack: the root is a login or main page, and every other page sits on
//! the only parent it can be reached from.

use lineterm_app::{App, AppAction, AppEvent, KeyInput, Page, PageId, PageKind};
use lineterm_session::{ConversationTarget, ConversationTargets, Message, SessionError};
use proptest::prelude::*;

/// Generate random printable characters for input.
fn printable_char() -> impl Strategy<Value = char> {
    prop::char::range(' ', '~')
}

/// Generate random key inputs.
fn key_strategy() -> impl Strategy<Value = KeyInput> {
    prop_oneof![
        4 => printable_char().prop_map(KeyInput::Char),
        3 => Just(KeyInput::Enter),
        1 => Just(KeyInput::Backspace),
        2 => Just(KeyInput::Tab),
        1 => Just(KeyInput::BackTab),
        1 => Just(KeyInput::Esc),
        2 => Just(KeyInput::Up),
        2 => Just(KeyInput::Down),
        1 => Just(KeyInput::ClearLine),
    ]
}

/// Session events addressed to one of the first few page ids.
fn session_event_strategy() -> impl Strategy<Value = AppEvent> {
    let page = (1u64..12).prop_map(PageId::new);
    prop_oneof![
        Just(AppEvent::LoggedIn),
        Just(AppEvent::TokenLoginUnavailable),
        "[0-9]{4}".prop_map(|pin_code| AppEvent::VerificationRequired { pin_code }),
        Just(AppEvent::LoginFailed { error: SessionError::protocol("denied") }),
        page.clone().prop_map(|page| AppEvent::VerificationFailed {
            page,
            error: SessionError::generic("timeout"),
        }),
        page.clone().prop_map(|page| AppEvent::TargetsLoaded {
            page,
            targets: ConversationTargets {
                groups: vec![ConversationTarget::group("g1", "climbers")],
                contacts: vec![ConversationTarget::contact("c1", "bob")],
            },
        }),
        page.clone().prop_map(|page| AppEvent::MessagesRefreshed {
            page,
            messages: vec![Message::from_sender("bob", "hi")],
        }),
        page.prop_map(|page| AppEvent::ChatClosed { page }),
        Just(AppEvent::SessionFailed { error: SessionError::generic("lost") }),
    ]
}

/// Generate random app events.
fn event_strategy() -> impl Strategy<Value = AppEvent> {
    prop_oneof![
        8 => key_strategy().prop_map(AppEvent::Key),
        4 => session_event_strategy(),
        1 => Just(AppEvent::Tick),
        1 => (1u16..200, 1u16..100).prop_map(|(c, r)| AppEvent::Resize(c, r)),
    ]
}

/// Kind a page must sit on top of. `None` for root pages.
fn required_parent(kind: PageKind) -> Option<PageKind> {
    match kind {
        PageKind::Login | PageKind::Main => None,
        PageKind::PinEntry => Some(PageKind::Login),
        PageKind::Targets => Some(PageKind::Main),
        PageKind::Chat => Some(PageKind::Targets),
    }
}

fn assert_stack_shape(app: &App) -> Result<(), TestCaseError> {
    let kinds: Vec<PageKind> = app.stack().iter().map(Page::kind).collect();
    prop_assert!(!kinds.is_empty());
    prop_assert_eq!(required_parent(kinds[0]), None, "bad root in {:?}", kinds);
    for pair in kinds.windows(2) {
        prop_assert_eq!(required_parent(pair[1]), Some(pair[0]), "bad parent in {:?}", kinds);
    }
    Ok(())
}

proptest! {
    /// The page stack keeps its shape under arbitrary event sequences.
    #[test]
    fn stack_shape_holds(events in prop::collection::vec(event_strategy(), 0..200)) {
        let mut app = App::new();
        let _ = app.start();

        for event in events {
            let actions = app.handle(event);
            if actions.contains(&AppAction::Quit) {
                break;
            }
            assert_stack_shape(&app)?;
        }
    }

    /// Page ids are never reused within one App.
    #[test]
    fn page_ids_are_unique(events in prop::collection::vec(event_strategy(), 0..200)) {
        let mut app = App::new();
        let _ = app.start();
        let mut seen = std::collections::HashSet::new();
        seen.insert(app.active_page().id());

        let mut previous: Vec<PageId> = app.stack().iter().map(Page::id).collect();
        for event in events {
            let _ = app.handle(event);
            let current: Vec<PageId> = app.stack().iter().map(Page::id).collect();
            for id in &current {
                if !previous.contains(id) {
                    prop_assert!(seen.insert(*id), "page id {} reused", id);
                }
            }
            previous = current;
        }
    }

    /// Only a confirmed close discards a chat page.
    #[test]
    fn chat_is_never_popped_by_keys(keys in prop::collection::vec(key_strategy(), 0..50)) {
        let mut app = chat_app();
        let chat = app.active_page().id();

        for key in keys {
            let _ = app.handle(AppEvent::Key(key));
            prop_assert!(app.stack().iter().any(|page| page.id() == chat));
        }
    }
}

/// App with a chat page open, reached through the real key sequence.
fn chat_app() -> App {
    let mut app = App::new();
    let _ = app.start();
    let _ = app.handle(AppEvent::LoggedIn);
    let _ = app.handle(AppEvent::Key(KeyInput::Enter));
    let listing = app.active_page().id();
    let _ = app.handle(AppEvent::TargetsLoaded {
        page: listing,
        targets: ConversationTargets {
            groups: vec![],
            contacts: vec![ConversationTarget::contact("c1", "bob")],
        },
    });
    let _ = app.handle(AppEvent::Key(KeyInput::Down));
    let _ = app.handle(AppEvent::Key(KeyInput::Enter));
    assert_eq!(app.active_page().kind(), PageKind::Chat);
    app
}
