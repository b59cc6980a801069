pub mod annotated;
pub mod document;
pub mod model_id;
pub mod session;

pub use annotated::{AlignmentStatus, AnnotatedDocument, CharInterval, ExampleData, Extraction};
pub use document::{LoadedDocument, MAX_ANALYZED_PAGES};
pub use model_id::ModelId;
pub use session::{QuerySpec, Session, SessionState};
