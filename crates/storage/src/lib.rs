pub mod dto;
pub mod error;
pub mod models;
pub mod repository;

pub use repository::report::ReportRepository;
pub use repository::session::SessionRepository;
