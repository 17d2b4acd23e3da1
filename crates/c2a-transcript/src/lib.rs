mod parse;
mod scan;

pub use parse::{parse_transcript, parse_transcript_str, resolve_nickname};
pub use scan::{is_transcript, scan_transcripts};
