//! Domain types exchanged with the external session client.

/// Number of recent messages fetched for a conversation view.
pub const RECENT_MESSAGE_LIMIT: usize = 50;

/// Whether a conversation target is a direct contact or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// One-to-one conversation.
    Contact,
    /// Group conversation.
    Group,
}

/// A contact or group a chat view is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationTarget {
    /// Contact or group.
    pub kind: TargetKind,
    /// Opaque identifier assigned by the service.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl ConversationTarget {
    /// Direct contact.
    pub fn contact(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { kind: TargetKind::Contact, id: id.into(), name: name.into() }
    }

    /// Group conversation.
    pub fn group(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { kind: TargetKind::Group, id: id.into(), name: name.into() }
    }
}

/// Groups and contacts the user can open a chat with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationTargets {
    /// Groups the user belongs to.
    pub groups: Vec<ConversationTarget>,
    /// Direct contacts.
    pub contacts: Vec<ConversationTarget>,
}

/// Content type tag of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// Plain text.
    Text,
    /// Still image.
    Image,
    /// Video clip.
    Video,
    /// Voice or audio clip.
    Audio,
    /// Sticker.
    Sticker,
    /// File attachment.
    File,
    /// Shared location.
    Location,
    /// Shared contact card.
    Contact,
    /// Any tag this client does not know.
    Other(u32),
}

impl ContentType {
    /// Label rendered in place of non-text content. `None` for text.
    pub fn placeholder_label(self) -> Option<&'static str> {
        match self {
            Self::Text => None,
            Self::Image => Some("IMAGE"),
            Self::Video => Some("VIDEO"),
            Self::Audio => Some("AUDIO"),
            Self::Sticker => Some("STICKER"),
            Self::File => Some("FILE"),
            Self::Location => Some("LOCATION"),
            Self::Contact => Some("CONTACT"),
            Self::Other(_) => Some("OTHER"),
        }
    }
}

/// A message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Display name of the sender. `None` for messages the user sent.
    pub sender: Option<String>,
    /// Text payload. Empty for most non-text content.
    pub text: String,
    /// Content type tag.
    pub content_type: ContentType,
}

impl Message {
    /// Text message from another participant.
    pub fn from_sender(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self { sender: Some(sender.into()), text: text.into(), content_type: ContentType::Text }
    }

    /// Text message authored by the user.
    pub fn own(text: impl Into<String>) -> Self {
        Self { sender: None, text: text.into(), content_type: ContentType::Text }
    }

    /// Same message with a different content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Whether the user authored this message.
    pub fn is_own(&self) -> bool {
        self.sender.is_none()
    }
}
