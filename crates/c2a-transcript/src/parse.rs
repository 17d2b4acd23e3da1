use c2a_core::{
    Envelope, EventKind, Member, Message, MissingNicknameError, ParseError, Record, RoomEvent,
    Timestamp, Transcript,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

// ── Element tree ──

/// Minimal owned element tree; only what the record mapping needs.
#[derive(Debug)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

#[derive(Debug)]
enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn has_attr(&self, key: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == key)
    }

    fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.name == name)
    }

    fn child<'a>(&'a self, name: &'a str) -> Option<&'a Element> {
        self.children_named(name).next()
    }

    /// Concatenated text of all descendants, markup dropped.
    fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(el) => el.collect_text(out),
            }
        }
    }
}

fn malformed(reader: &Reader<&[u8]>, message: impl ToString) -> ParseError {
    ParseError::Malformed {
        position: reader.error_position(),
        message: message.to_string(),
    }
}

fn open_element(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Element, ParseError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(reader, e))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| malformed(reader, e))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(Element {
        name,
        attrs,
        children: Vec::new(),
    })
}

/// Build the element tree, rejecting anything that is not well-formed.
fn read_tree(xml: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| malformed(&reader, e))?;
        match event {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(malformed(&reader, "content after the root element"));
                }
                let element = open_element(&reader, &start)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                if root.is_some() {
                    return Err(malformed(&reader, "content after the root element"));
                }
                let element = open_element(&reader, &start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(element)),
                    None => root = Some(element),
                }
            }
            Event::End(_) => {
                let Some(done) = stack.pop() else {
                    return Err(malformed(&reader, "unbalanced end tag"));
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(done)),
                    None => root = Some(done),
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| malformed(&reader, e))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Text(text.into_owned())),
                    None if text.trim().is_empty() => {}
                    None => return Err(malformed(&reader, "text outside the root element")),
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&data).into_owned();
                    parent.children.push(Node::Text(text));
                }
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(&reader, format!("unclosed element <{}>", open.name)));
    }
    root.ok_or(ParseError::Empty)
}

// ── Record mapping ──

fn required_timestamp(
    el: &Element,
    element: &'static str,
    attribute: &'static str,
) -> Result<Timestamp, ParseError> {
    let raw = el
        .attr(attribute)
        .ok_or(ParseError::MissingAttribute { element, attribute })?;
    Timestamp::parse(raw).map_err(|source| ParseError::InvalidTimestamp {
        element,
        attribute,
        source,
    })
}

fn map_event(el: &Element) -> Result<RoomEvent, ParseError> {
    let kind = EventKind::from_name(el.attr("name").unwrap_or_default());
    let occurred = required_timestamp(el, "event", "occurred")?;
    let who = el.child("who").map(|who| Member {
        nick: who.text().trim().to_string(),
        hostmask: who.attr("hostmask").unwrap_or_default().to_string(),
    });
    let reason = el.child("reason").map(|r| r.text().trim().to_string());
    Ok(RoomEvent {
        kind,
        occurred,
        who,
        reason,
    })
}

fn map_envelope(el: &Element) -> Result<Envelope, ParseError> {
    let sender = el
        .child("sender")
        .ok_or(ParseError::MissingElement {
            parent: "envelope",
            element: "sender",
        })?
        .text()
        .trim()
        .to_string();
    let messages = el
        .children_named("message")
        .map(|msg| -> Result<Message, ParseError> {
            Ok(Message {
                content: msg.text(),
                received: required_timestamp(msg, "message", "received")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Envelope { sender, messages })
}

/// First `sender` carrying a `self` attribute directly under a root envelope.
fn find_self_nickname(root: &Element) -> Option<String> {
    root.children_named("envelope")
        .flat_map(|env| env.children_named("sender"))
        .filter(|sender| sender.has_attr("self"))
        .map(|sender| sender.text().trim().to_string())
        .find(|nick| !nick.is_empty())
}

/// Parse a transcript held in memory.
pub fn parse_transcript_str(xml: &str) -> Result<Transcript, ParseError> {
    let root = read_tree(xml)?;
    if root.name != "log" {
        return Err(ParseError::UnexpectedRoot(root.name));
    }

    let began = required_timestamp(&root, "log", "began")?;
    let self_nickname = find_self_nickname(&root);

    let mut records = Vec::new();
    for el in root.elements() {
        match el.name.as_str() {
            "event" => records.push(Record::Event(map_event(el)?)),
            "envelope" => records.push(Record::Envelope(map_envelope(el)?)),
            other => tracing::debug!(element = other, "ignoring top-level element"),
        }
    }

    Ok(Transcript {
        began,
        self_nickname,
        records,
    })
}

/// Read and parse one `.colloquyTranscript` file.
pub fn parse_transcript(path: &Path) -> Result<Transcript, ParseError> {
    let xml = std::fs::read_to_string(path)?;
    parse_transcript_str(&xml)
}

/// Pick the account nickname: the transcript's own self marker wins, then
/// the caller's fallback.
pub fn resolve_nickname(
    transcript: &Transcript,
    fallback: Option<&str>,
) -> Result<String, MissingNicknameError> {
    transcript
        .self_nickname
        .as_deref()
        .or(fallback)
        .map(str::trim)
        .filter(|nick| !nick.is_empty())
        .map(str::to_string)
        .ok_or(MissingNicknameError)
}
