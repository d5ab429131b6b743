pub mod chunk;
pub mod intent;
pub mod redact;
pub mod tokenize;

pub use chunk::{Chunk, Lang, TopicGroup, Visibility};
pub use intent::QueryIntents;
