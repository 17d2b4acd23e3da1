//! Adium chatlog serialization.
//!
//! Output is compact: no indentation and no whitespace between elements, only
//! a newline after the XML declaration and at the end of the document.

use c2a_core::{ChatLog, ChatNode, Inline, WriteError};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const ITALIC_STYLE: &str = "font-style: italic;";

type XmlWriter = Writer<Vec<u8>>;

fn serialize_err(err: impl std::fmt::Display) -> WriteError {
    WriteError::Serialize(err.to_string())
}

fn emit<'a>(w: &mut XmlWriter, event: impl Into<Event<'a>>) -> Result<(), WriteError> {
    w.write_event(event).map_err(serialize_err)
}

/// Text node escaping only `<`, `>` and `&`; quotes stay literal.
fn text(raw: &str) -> Event<'_> {
    Event::Text(BytesText::from_escaped(partial_escape(raw)))
}

/// `<div>` with escaped text content.
fn write_div(w: &mut XmlWriter, parts: &[Inline]) -> Result<(), WriteError> {
    emit(w, Event::Start(BytesStart::new("div")))?;
    for part in parts {
        match part {
            Inline::Text(s) => emit(w, text(s))?,
            Inline::Italic(s) => {
                let span = BytesStart::new("span").with_attributes([("style", ITALIC_STYLE)]);
                emit(w, Event::Start(span))?;
                emit(w, text(s))?;
                emit(w, Event::End(BytesEnd::new("span")))?;
            }
        }
    }
    emit(w, Event::End(BytesEnd::new("div")))
}

fn write_node(w: &mut XmlWriter, node: &ChatNode) -> Result<(), WriteError> {
    match node {
        ChatNode::Window { kind, sender, time } => {
            let time = time.canonical();
            let el = BytesStart::new("event").with_attributes([
                ("type", kind.as_str()),
                ("sender", sender.as_str()),
                ("time", time.as_str()),
            ]);
            emit(w, Event::Empty(el))
        }
        ChatNode::Status {
            kind,
            time,
            sender,
            body,
        } => {
            let time = time.canonical();
            let mut attrs: Vec<(&str, &str)> = Vec::with_capacity(3);
            if let Some(kind) = kind {
                attrs.push(("type", kind.as_str()));
            }
            if let Some(sender) = sender {
                attrs.push(("sender", sender.as_str()));
            }
            attrs.push(("time", time.as_str()));

            emit(w, Event::Start(BytesStart::new("status").with_attributes(attrs)))?;
            write_div(w, body)?;
            emit(w, Event::End(BytesEnd::new("status")))
        }
        ChatNode::Message { sender, time, body } => {
            let time = time.canonical();
            let el = BytesStart::new("message")
                .with_attributes([("sender", sender.as_str()), ("time", time.as_str())]);
            emit(w, Event::Start(el))?;
            write_div(w, &[Inline::Text(body.clone())])?;
            emit(w, Event::End(BytesEnd::new("message")))
        }
    }
}

/// Serialize a chatlog to the bytes of a `.chatlog` file.
pub fn render_chatlog(log: &ChatLog) -> Result<Vec<u8>, WriteError> {
    let mut w = Writer::new(Vec::new());
    emit(&mut w, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    w.get_mut().push(b'\n');

    let root = BytesStart::new("chat").with_attributes([
        ("xmlns", log.namespace()),
        ("account", log.account.as_str()),
        ("service", log.service()),
    ]);
    emit(&mut w, Event::Start(root))?;
    for node in &log.nodes {
        write_node(&mut w, node)?;
    }
    emit(&mut w, Event::End(BytesEnd::new("chat")))?;

    let mut bytes = w.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}
