pub mod models;
pub mod overlay;
pub mod refresh;
pub mod symbol_index;

pub use models::*;
pub use overlay::{DocumentStore, OpenDocument};
pub use refresh::{RefreshGate, RefreshOutcome};
pub use symbol_index::{IndexGeneration, SymbolIndex};
