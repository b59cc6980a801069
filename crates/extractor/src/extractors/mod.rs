pub mod aligner;
pub mod gemini_client;
pub mod preprocessor;
pub mod prompts;
pub mod resolver;
pub mod validator;

pub use aligner::Aligner;
pub use gemini_client::GeminiClient;
pub use preprocessor::{Preprocessor, TextChunk};
pub use prompts::PromptBuilder;
pub use resolver::Resolver;
pub use validator::{ExtractionValidator, ValidationReport};
