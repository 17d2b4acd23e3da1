use c2a_core::{
    ChatLog, ChatNode, Envelope, EventKind, Inline, Member, Record, RoomEvent, StatusKind,
    Transcript, WindowKind,
};

/// What to emit for an event whose name has no mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownEventPolicy {
    /// Emit nothing.
    #[default]
    Skip,
    /// Emit a `status` with the event time, no type and an empty body, the
    /// way older converters did.
    EmptyStatus,
}

#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    pub unknown_events: UnknownEventPolicy,
}

/// Translate one transcript into an Adium chatlog for `nickname`.
///
/// Output order follows record order. The first node is always a synthetic
/// `windowOpened` at the session start. Translation never fails; events it
/// has no rule for are handled per [`UnknownEventPolicy`].
pub fn translate(transcript: &Transcript, nickname: &str, opts: &TranslateOptions) -> ChatLog {
    let mut nodes = Vec::with_capacity(transcript.records.len() + 1);
    nodes.push(ChatNode::Window {
        kind: WindowKind::Opened,
        sender: nickname.to_string(),
        time: transcript.began,
    });

    for record in &transcript.records {
        match record {
            Record::Event(event) => nodes.extend(translate_event(event, nickname, opts)),
            Record::Envelope(envelope) => nodes.extend(translate_envelope(envelope)),
        }
    }

    ChatLog {
        account: nickname.to_string(),
        nodes,
    }
}

fn translate_envelope(envelope: &Envelope) -> impl Iterator<Item = ChatNode> + '_ {
    envelope.messages.iter().map(|msg| ChatNode::Message {
        sender: envelope.sender.clone(),
        time: msg.received,
        body: msg.content.clone(),
    })
}

fn translate_event(
    event: &RoomEvent,
    nickname: &str,
    opts: &TranslateOptions,
) -> Option<ChatNode> {
    let time = event.occurred;
    let member = event.who.clone().unwrap_or_default();

    let status = |kind, sender: Option<&str>, body: Vec<Inline>| ChatNode::Status {
        kind: Some(kind),
        time,
        sender: sender.map(str::to_string),
        body,
    };

    match &event.kind {
        EventKind::Parted => Some(ChatNode::Window {
            kind: WindowKind::Closed,
            sender: nickname.to_string(),
            time,
        }),
        EventKind::MemberJoined => Some(status(StatusKind::Purple, None, joined_body(&member))),
        EventKind::MemberParted => Some(status(
            StatusKind::Purple,
            None,
            vec![Inline::Text(left_text(&member, event.reason.as_deref()))],
        )),
        EventKind::Disconnected => Some(status(
            StatusKind::Disconnected,
            Some(nickname),
            vec![Inline::Text("You have disconnected".into())],
        )),
        EventKind::Rejoined => Some(status(
            StatusKind::Connected,
            None,
            vec![Inline::Text("You have connected".into())],
        )),
        EventKind::Other(name) => match opts.unknown_events {
            UnknownEventPolicy::Skip => {
                tracing::debug!(event = %name, %time, "ignoring unknown event");
                None
            }
            UnknownEventPolicy::EmptyStatus => Some(ChatNode::Status {
                kind: None,
                time,
                sender: None,
                body: Vec::new(),
            }),
        },
    }
}

fn joined_body(member: &Member) -> Vec<Inline> {
    vec![
        Inline::Text(format!("{} [", member.nick)),
        Inline::Italic(member.hostmask.clone()),
        Inline::Text("] entered the room.".into()),
    ]
}

fn left_text(member: &Member, reason: Option<&str>) -> String {
    match reason {
        Some(reason) => format!("{} left the room ({reason}).", member.nick),
        None => format!("{} left the room.", member.nick),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use c2a_core::{inline_text, Message, Timestamp};

    fn ts(raw: &str) -> Timestamp {
        Timestamp::parse(raw).unwrap()
    }

    fn event(kind: EventKind, at: &str) -> RoomEvent {
        RoomEvent {
            kind,
            occurred: ts(at),
            who: None,
            reason: None,
        }
    }

    fn member(nick: &str, hostmask: &str) -> Option<Member> {
        Some(Member {
            nick: nick.into(),
            hostmask: hostmask.into(),
        })
    }

    fn transcript(records: Vec<Record>) -> Transcript {
        Transcript {
            began: ts("2024-01-01T10:00:00Z"),
            self_nickname: None,
            records,
        }
    }

    fn status_text(node: &ChatNode) -> (Option<StatusKind>, String) {
        match node {
            ChatNode::Status { kind, body, .. } => (*kind, inline_text(body)),
            other => panic!("expected status, got {other:?}"),
        }
    }

    #[test]
    fn alice_scenario() {
        let t = transcript(vec![
            Record::Event(RoomEvent {
                who: member("alice", "alice@host"),
                ..event(EventKind::MemberJoined, "2024-01-01T10:00:00Z")
            }),
            Record::Envelope(Envelope {
                sender: "alice".into(),
                messages: vec![Message {
                    content: "hello".into(),
                    received: ts("2024-01-01T10:00:05Z"),
                }],
            }),
            Record::Event(event(EventKind::Parted, "2024-01-01T10:05:00Z")),
        ]);

        let log = translate(&t, "me", &TranslateOptions::default());
        assert_eq!(log.account, "me");
        assert_eq!(
            log.nodes,
            vec![
                ChatNode::Window {
                    kind: WindowKind::Opened,
                    sender: "me".into(),
                    time: ts("2024-01-01T10:00:00Z"),
                },
                ChatNode::Status {
                    kind: Some(StatusKind::Purple),
                    time: ts("2024-01-01T10:00:00Z"),
                    sender: None,
                    body: vec![
                        Inline::Text("alice [".into()),
                        Inline::Italic("alice@host".into()),
                        Inline::Text("] entered the room.".into()),
                    ],
                },
                ChatNode::Message {
                    sender: "alice".into(),
                    time: ts("2024-01-01T10:00:05Z"),
                    body: "hello".into(),
                },
                ChatNode::Window {
                    kind: WindowKind::Closed,
                    sender: "me".into(),
                    time: ts("2024-01-01T10:05:00Z"),
                },
            ]
        );
    }

    #[test]
    fn empty_transcript_still_opens_window() {
        let log = translate(&transcript(vec![]), "me", &TranslateOptions::default());
        assert_eq!(log.nodes.len(), 1);
        assert!(matches!(
            log.nodes[0],
            ChatNode::Window {
                kind: WindowKind::Opened,
                ..
            }
        ));
        assert_eq!(log.nodes[0].time(), ts("2024-01-01T10:00:00Z"));
    }

    #[test]
    fn parted_closes_window_and_later_records_continue() {
        let t = transcript(vec![
            Record::Event(event(EventKind::Parted, "2024-01-01T10:01:00Z")),
            Record::Event(event(EventKind::Rejoined, "2024-01-01T10:02:00Z")),
        ]);
        let log = translate(&t, "me", &TranslateOptions::default());
        assert_eq!(log.nodes.len(), 3);
        let opened = log
            .nodes
            .iter()
            .filter(|n| matches!(n, ChatNode::Window { kind: WindowKind::Opened, .. }))
            .count();
        let closed = log
            .nodes
            .iter()
            .filter(|n| matches!(n, ChatNode::Window { kind: WindowKind::Closed, .. }))
            .count();
        assert_eq!((opened, closed), (1, 1));
        assert_eq!(
            status_text(&log.nodes[2]),
            (Some(StatusKind::Connected), "You have connected".into())
        );
    }

    #[test]
    fn member_parted_mentions_reason_only_when_present() {
        let t = transcript(vec![
            Record::Event(RoomEvent {
                who: member("carol", "c@x"),
                reason: Some("Quit: bye".into()),
                ..event(EventKind::MemberParted, "2024-01-01T10:01:00Z")
            }),
            Record::Event(RoomEvent {
                who: member("dave", "d@x"),
                ..event(EventKind::MemberParted, "2024-01-01T10:02:00Z")
            }),
        ]);
        let log = translate(&t, "me", &TranslateOptions::default());
        assert_eq!(
            status_text(&log.nodes[1]),
            (
                Some(StatusKind::Purple),
                "carol left the room (Quit: bye).".into()
            )
        );
        assert_eq!(
            status_text(&log.nodes[2]),
            (Some(StatusKind::Purple), "dave left the room.".into())
        );
    }

    #[test]
    fn disconnected_carries_account_sender() {
        let t = transcript(vec![Record::Event(event(
            EventKind::Disconnected,
            "2024-01-01T10:03:00Z",
        ))]);
        let log = translate(&t, "me", &TranslateOptions::default());
        match &log.nodes[1] {
            ChatNode::Status {
                kind,
                sender,
                body,
                time,
            } => {
                assert_eq!(*kind, Some(StatusKind::Disconnected));
                assert_eq!(sender.as_deref(), Some("me"));
                assert_eq!(inline_text(body), "You have disconnected");
                assert_eq!(*time, ts("2024-01-01T10:03:00Z"));
            }
            other => panic!("expected status, got {other:?}"),
        }
    }

    #[test]
    fn unknown_events_skipped_by_default() {
        let t = transcript(vec![Record::Event(event(
            EventKind::Other("topicChanged".into()),
            "2024-01-01T10:01:00Z",
        ))]);
        let log = translate(&t, "me", &TranslateOptions::default());
        assert_eq!(log.nodes.len(), 1);
    }

    #[test]
    fn unknown_events_can_emit_empty_status() {
        let t = transcript(vec![Record::Event(event(
            EventKind::Other("topicChanged".into()),
            "2024-01-01T10:01:00Z",
        ))]);
        let opts = TranslateOptions {
            unknown_events: UnknownEventPolicy::EmptyStatus,
        };
        let log = translate(&t, "me", &opts);
        assert_eq!(
            log.nodes[1],
            ChatNode::Status {
                kind: None,
                time: ts("2024-01-01T10:01:00Z"),
                sender: None,
                body: vec![],
            }
        );
    }

    #[test]
    fn join_without_who_uses_empty_member() {
        let t = transcript(vec![Record::Event(event(
            EventKind::MemberJoined,
            "2024-01-01T10:01:00Z",
        ))]);
        let log = translate(&t, "me", &TranslateOptions::default());
        assert_eq!(status_text(&log.nodes[1]).1, " [] entered the room.");
    }

    #[test]
    fn envelope_expands_in_message_order() {
        let t = transcript(vec![Record::Envelope(Envelope {
            sender: "alice".into(),
            messages: vec![
                Message {
                    content: "one".into(),
                    received: ts("2024-01-01T10:00:01Z"),
                },
                Message {
                    content: "two".into(),
                    received: ts("2024-01-01T10:00:02Z"),
                },
            ],
        })]);
        let log = translate(&t, "me", &TranslateOptions::default());
        let bodies: Vec<&str> = log
            .nodes
            .iter()
            .filter_map(|n| match n {
                ChatNode::Message { sender, body, .. } => {
                    assert_eq!(sender, "alice");
                    Some(body.as_str())
                }
                _ => None,
            })
            .collect();
        assert_eq!(bodies, vec!["one", "two"]);
    }

    #[test]
    fn translation_preserves_record_order() {
        // Out-of-order input stays out of order: nothing is sorted.
        let t = transcript(vec![
            Record::Event(event(EventKind::Rejoined, "2024-01-01T10:09:00Z")),
            Record::Event(event(EventKind::Disconnected, "2024-01-01T10:01:00Z")),
            Record::Event(event(EventKind::Rejoined, "2024-01-01T10:05:00Z")),
        ]);
        let log = translate(&t, "me", &TranslateOptions::default());
        let times: Vec<String> = log.nodes[1..].iter().map(|n| n.time().canonical()).collect();
        assert_eq!(
            times,
            vec![
                "2024-01-01T10:09:00Z",
                "2024-01-01T10:01:00Z",
                "2024-01-01T10:05:00Z"
            ]
        );
    }

    #[test]
    fn translate_parsed_transcript() {
        let xml = r#"<log began="2024-01-01T10:00:00Z">
            <event name="memberJoined" occurred="2024-01-01T10:00:00Z">
              <who hostmask="alice@host">alice</who>
            </event>
            <envelope><sender>alice</sender>
              <message received="2024-01-01T10:00:05Z">hello</message>
            </envelope>
            <event name="parted" occurred="2024-01-01T10:05:00Z"/>
        </log>"#;
        let t = c2a_transcript::parse_transcript_str(xml).unwrap();
        let log = translate(&t, "me", &TranslateOptions::default());
        let times: Vec<String> = log.nodes.iter().map(|n| n.time().canonical()).collect();
        assert_eq!(
            times,
            vec![
                "2024-01-01T10:00:00Z",
                "2024-01-01T10:00:00Z",
                "2024-01-01T10:00:05Z",
                "2024-01-01T10:05:00Z"
            ]
        );
    }
}
