//! Markdown ⇄ block codec.
//!
//! Converts between the flat markdown text kept on disk and the ordered
//! sequence of typed blocks stored by the remote document service.
//!
//! The conversion is lossy: list numerals are recomputed, paragraphs are
//! re-wrapped onto one line, level-3 headings come back as plain text and
//! runs of blank lines collapse. After one normalization pass the codec is
//! stable:
//!
//! ```
//! use mdsync::codec::{decode, encode};
//!
//! let text = "# Title\n\n3. first\n7. second\nsome\nwrapped text\n";
//! let once = decode(&encode(text));
//! assert_eq!(once, "# Title\n1. first\n2. second\nsome wrapped text\n");
//! assert_eq!(decode(&encode(&once)), once);
//! ```

pub mod block;
pub mod decode;
pub mod encode;
pub mod html;

pub use block::{BlockKind, ContentBlock, HeadingLevel, DEFAULT_CODE_LANGUAGE};
pub use decode::decode;
pub use encode::encode;
pub use html::render_html;
