//! Language-model service implementations

mod openai;

pub use openai::OpenAiProvider;
