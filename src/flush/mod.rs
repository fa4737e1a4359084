mod jsonl;

pub use jsonl::{JsonlSaveStore, MAX_HISTORY};
