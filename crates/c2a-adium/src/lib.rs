//! Colloquy records in, Adium chatlogs out.

pub mod render;
pub mod translate;

pub use render::render_chatlog;
pub use translate::{translate, TranslateOptions, UnknownEventPolicy};
