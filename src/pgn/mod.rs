pub mod normalizer;
pub mod replayer;
pub mod tokenizer;

pub use normalizer::{normalize_pairs, normalize_token, MovePair};
pub use replayer::{GameReplayer, ReplayReport, SkippedMove};
pub use tokenizer::tokenize;
