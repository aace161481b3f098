pub mod corpus;
pub mod focus;
pub mod instance;
pub mod sequence;
pub mod text;

pub use corpus::{ConllCorpusReader, CorpusReader};
pub use focus::Focus;
pub use instance::Instance;
pub use sequence::{Sequence, Token};
pub use text::{DependencyParser, Tokenizer, WhitespaceTokenizer};
