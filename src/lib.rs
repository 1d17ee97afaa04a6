pub mod audio;
pub mod config;
pub mod engine;
pub mod history;
pub mod models;
pub mod result;
pub mod server;
pub mod text;

mod pipeline_tests;

pub use engine::EmotionEngine;
pub use history::{ChatHistory, ChatMessage, MessageKind, Sender};
pub use result::{EmotionResult, OrDegraded};
