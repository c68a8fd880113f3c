//! Conversation view.

use std::collections::VecDeque;

use lineterm_session::{ConversationTarget, Message, RECENT_MESSAGE_LIMIT};

use super::{PageId, PageIntent, cycle};
use crate::{KeyInput, TextInput};

/// Focusable widgets, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatFocus {
    /// Message input box.
    Input,
    /// Send button.
    Send,
    /// Back button.
    Back,
}

const FOCUS_ORDER: [ChatFocus; 3] = [ChatFocus::Input, ChatFocus::Send, ChatFocus::Back];

/// Rendered content of one transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatBody {
    /// Text payload.
    Text(String),
    /// Label standing in for non-text content.
    Placeholder(&'static str),
}

/// One line of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    /// Sender display name. `None` for the user's own messages.
    pub author: Option<String>,
    /// Content.
    pub body: ChatBody,
}

impl ChatLine {
    /// Whether the user sent this line.
    pub fn is_own(&self) -> bool {
        self.author.is_none()
    }
}

impl From<Message> for ChatLine {
    fn from(message: Message) -> Self {
        let body = match message.content_type.placeholder_label() {
            Some(label) => ChatBody::Placeholder(label),
            None => ChatBody::Text(message.text),
        };
        Self { author: message.sender, body }
    }
}

/// Transcript plus input box for one conversation target.
#[derive(Debug, Clone)]
pub struct ChatPage {
    id: PageId,
    target: Option<ConversationTarget>,
    title: String,
    lines: Vec<ChatLine>,
    input: TextInput,
    focus: ChatFocus,
    closing: bool,
}

impl ChatPage {
    /// Empty view scoped to `target`.
    pub fn new(id: PageId, target: ConversationTarget) -> Self {
        Self {
            id,
            title: target.name.clone(),
            target: Some(target),
            lines: Vec::new(),
            input: TextInput::new(),
            focus: ChatFocus::Input,
            closing: false,
        }
    }

    /// Instance id.
    pub fn id(&self) -> PageId {
        self.id
    }

    /// Conversation target. Cleared once the page starts closing.
    pub fn target(&self) -> Option<&ConversationTarget> {
        self.target.as_ref()
    }

    /// Display name of the conversation.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Transcript, oldest first.
    pub fn lines(&self) -> &[ChatLine] {
        &self.lines
    }

    /// Input box.
    pub fn input(&self) -> &TextInput {
        &self.input
    }

    /// Focused widget.
    pub fn focus(&self) -> ChatFocus {
        self.focus
    }

    /// Whether the page waits for its poller to stop.
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Rebuild the transcript from a newest-first fetch.
    ///
    /// The fetch is walked into a window of [`RECENT_MESSAGE_LIMIT`] entries
    /// that evicts from the front, then reversed. An oversized fetch keeps
    /// its oldest entries.
    pub fn apply_messages(&mut self, newest_first: Vec<Message>) {
        let mut window: VecDeque<ChatLine> = VecDeque::with_capacity(RECENT_MESSAGE_LIMIT);
        for message in newest_first {
            if window.len() == RECENT_MESSAGE_LIMIT {
                window.pop_front();
            }
            window.push_back(ChatLine::from(message));
        }
        self.lines = window.into_iter().rev().collect();
    }

    pub(crate) fn begin_close(&mut self) {
        self.target = None;
        self.closing = true;
    }

    pub(crate) fn handle_key(&mut self, key: KeyInput) -> PageIntent {
        if self.closing {
            return PageIntent::None;
        }

        match key {
            KeyInput::Esc => PageIntent::CloseChat,
            KeyInput::Tab => self.move_focus(true),
            KeyInput::BackTab => self.move_focus(false),
            KeyInput::Enter => match self.focus {
                ChatFocus::Input | ChatFocus::Send => self.send(),
                ChatFocus::Back => PageIntent::CloseChat,
            },
            other if self.focus == ChatFocus::Input => {
                if self.input.handle_key(other) { PageIntent::Redraw } else { PageIntent::None }
            },
            _ => PageIntent::None,
        }
    }

    fn move_focus(&mut self, forward: bool) -> PageIntent {
        let index = FOCUS_ORDER.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = FOCUS_ORDER[cycle(index, FOCUS_ORDER.len(), forward)];
        PageIntent::Redraw
    }

    fn send(&mut self) -> PageIntent {
        if self.input.is_empty() {
            return PageIntent::None;
        }
        let Some(target) = self.target.clone() else {
            return PageIntent::None;
        };

        let text = self.input.take();
        self.focus = ChatFocus::Input;
        PageIntent::SendMessage { target, text }
    }
}

#[cfg(test)]
mod tests {
    use lineterm_session::ContentType;
    use proptest::prelude::*;

    use super::*;

    fn page() -> ChatPage {
        ChatPage::new(PageId::new(5), ConversationTarget::contact("c1", "bob"))
    }

    /// `count` messages, newest first, numbered so that `m1` is the oldest.
    fn fetch(count: usize) -> Vec<Message> {
        (1..=count).rev().map(|n| Message::from_sender("bob", format!("m{n}"))).collect()
    }

    fn texts(page: &ChatPage) -> Vec<String> {
        page.lines()
            .iter()
            .map(|line| match &line.body {
                ChatBody::Text(text) => text.clone(),
                ChatBody::Placeholder(label) => (*label).to_string(),
            })
            .collect()
    }

    #[test]
    fn full_fetch_renders_oldest_first() {
        let mut page = page();
        page.apply_messages(fetch(50));

        let texts = texts(&page);
        assert_eq!(texts.len(), 50);
        assert_eq!(texts.first().map(String::as_str), Some("m1"));
        assert_eq!(texts.last().map(String::as_str), Some("m50"));
    }

    #[test]
    fn oversized_fetch_drops_fifty_first_oldest() {
        let mut page = page();
        page.apply_messages(fetch(51));

        let texts = texts(&page);
        assert_eq!(texts.len(), 50);
        assert!(!texts.contains(&"m51".to_string()));
    }

    #[test]
    fn non_text_content_becomes_placeholder() {
        let mut page = page();
        page.apply_messages(vec![
            Message::from_sender("bob", "").with_content_type(ContentType::Image),
            Message::own("hi"),
        ]);

        assert_eq!(page.lines()[0], ChatLine {
            author: None,
            body: ChatBody::Text("hi".into())
        });
        assert_eq!(page.lines()[1].body, ChatBody::Placeholder("IMAGE"));
    }

    #[test]
    fn send_takes_input_and_refocuses() {
        let mut page = page();
        for c in "héllo".chars() {
            page.handle_key(KeyInput::Char(c));
        }
        page.handle_key(KeyInput::Tab);
        assert_eq!(page.focus(), ChatFocus::Send);

        let intent = page.handle_key(KeyInput::Enter);

        assert_eq!(intent, PageIntent::SendMessage {
            target: ConversationTarget::contact("c1", "bob"),
            text: "héllo".into()
        });
        assert!(page.input().is_empty());
        assert_eq!(page.focus(), ChatFocus::Input);
    }

    #[test]
    fn empty_send_is_a_no_op() {
        let mut page = page();
        assert_eq!(page.handle_key(KeyInput::Enter), PageIntent::None);
    }

    #[test]
    fn closing_clears_target_and_ignores_input() {
        let mut page = page();
        assert_eq!(page.handle_key(KeyInput::Esc), PageIntent::CloseChat);

        page.begin_close();

        assert!(page.target().is_none());
        assert!(page.is_closing());
        assert_eq!(page.handle_key(KeyInput::Char('x')), PageIntent::None);
    }

    proptest! {
        #[test]
        fn window_is_chronological_and_bounded(count in 0usize..120) {
            let mut page = page();
            page.apply_messages(fetch(count));

            let expected: Vec<String> =
                (1..=count.min(RECENT_MESSAGE_LIMIT)).map(|n| format!("m{n}")).collect();
            prop_assert_eq!(texts(&page), expected);
        }
    }
}
