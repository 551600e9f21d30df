//! Prompt assembly for the generation modes

mod template;

pub use template::PromptTemplate;
