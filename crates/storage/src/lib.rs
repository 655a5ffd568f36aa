#![forbid(unsafe_code)]

pub mod json_dir;
pub mod repository;
pub mod results_codec;
pub mod sqlite;

pub use json_dir::JsonDirectorySource;
pub use repository::{
    InMemoryRepository, QuestionSetEntry, QuestionSetRepository, ResultsLogRepository, Storage,
    StorageError,
};
