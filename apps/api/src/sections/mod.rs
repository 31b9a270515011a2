// Section Parser: flat CV text → insertion-ordered map of canonical section bodies.
// Pure and synchronous; never fails. Heading detection is a rule table (headings.rs),
// accumulation is a fold over lines (parser.rs).

pub mod blocks;
pub mod headings;
pub mod models;
pub mod parser;

pub use blocks::{paragraph_blocks, RenderItem};
pub use models::{ParsedDocument, CANONICAL_SECTIONS, HEADER_SECTION};
pub use parser::parse_sections;
