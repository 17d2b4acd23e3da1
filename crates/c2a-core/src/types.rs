use crate::timestamp::Timestamp;

/// XML namespace of the Adium chatlog schema.
pub const ADIUM_NAMESPACE: &str = "http://purl.org/net/ulf/ns/0.4-02";

/// Service tag written on every chatlog root.
pub const SERVICE_IRC: &str = "IRC";

/// File extension of Colloquy transcripts (no leading dot).
pub const TRANSCRIPT_EXTENSION: &str = "colloquyTranscript";

/// File extension of Adium chatlogs (no leading dot).
pub const CHATLOG_EXTENSION: &str = "chatlog";

// ── Colloquy side ──

/// One parsed Colloquy transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    /// Session start, from the root `began` attribute.
    pub began: Timestamp,
    /// Text of the first `sender` marked `self`, if the transcript has one.
    pub self_nickname: Option<String>,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Event(RoomEvent),
    Envelope(Envelope),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomEvent {
    pub kind: EventKind,
    pub occurred: Timestamp,
    pub who: Option<Member>,
    pub reason: Option<String>,
}

/// Value of an `event` element's `name` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Parted,
    MemberJoined,
    MemberParted,
    Disconnected,
    Rejoined,
    Other(String),
}

impl EventKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "parted" => Self::Parted,
            "memberJoined" => Self::MemberJoined,
            "memberParted" => Self::MemberParted,
            "disconnected" => Self::Disconnected,
            "rejoined" => Self::Rejoined,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Parted => "parted",
            Self::MemberJoined => "memberJoined",
            Self::MemberParted => "memberParted",
            Self::Disconnected => "disconnected",
            Self::Rejoined => "rejoined",
            Self::Other(name) => name,
        }
    }
}

/// The `who` of a room event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Member {
    pub nick: String,
    pub hostmask: String,
}

/// Consecutive messages from one sender.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub sender: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub content: String,
    pub received: Timestamp,
}

// ── Adium side ──

/// A translated Adium chatlog, ready to serialize.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatLog {
    pub account: String,
    pub nodes: Vec<ChatNode>,
}

impl ChatLog {
    pub fn namespace(&self) -> &'static str {
        ADIUM_NAMESPACE
    }

    pub fn service(&self) -> &'static str {
        SERVICE_IRC
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatNode {
    Window {
        kind: WindowKind,
        sender: String,
        time: Timestamp,
    },
    Status {
        /// `None` only for the legacy empty status of unknown events.
        kind: Option<StatusKind>,
        time: Timestamp,
        sender: Option<String>,
        body: Vec<Inline>,
    },
    Message {
        sender: String,
        time: Timestamp,
        body: String,
    },
}

impl ChatNode {
    pub fn time(&self) -> Timestamp {
        match self {
            Self::Window { time, .. } | Self::Status { time, .. } | Self::Message { time, .. } => {
                *time
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Opened,
    Closed,
}

impl WindowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opened => "windowOpened",
            Self::Closed => "windowClosed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Purple,
    Disconnected,
    Connected,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purple => "purple",
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
        }
    }
}

/// A run of status body content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    /// Rendered inside an italic `span`.
    Italic(String),
}

/// Plain-text rendering of a status body, with italic markers dropped.
pub fn inline_text(body: &[Inline]) -> String {
    body.iter()
        .map(|part| match part {
            Inline::Text(s) | Inline::Italic(s) => s.as_str(),
        })
        .collect()
}
