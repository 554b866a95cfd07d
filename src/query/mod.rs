pub mod dispatcher;
pub mod position;

pub use dispatcher::{CompletionItem, CompletionKind, Hover, QueryDispatcher};
pub use position::{identifier_at, is_tag_start, offset_at, Position};
