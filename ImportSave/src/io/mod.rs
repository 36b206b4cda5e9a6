//! Binary input helpers shared by the translators

mod cursor;
mod stream;

pub use cursor::{ByteCursor, FileCursor, StreamCursor};
pub use stream::SaveStream;
