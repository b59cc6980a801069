pub mod engine;
pub mod error;
pub mod extractors;
pub mod loader;
pub mod traits;
pub mod visualization;

pub use engine::LangExtractor;
pub use error::{ExtractorError, Result};
pub use extractors::{GeminiClient, PromptBuilder};
pub use loader::PdfLoader;
pub use traits::{ExtractionEngine, ExtractionRequest};
pub use visualization::{visualize, visualize_file};
