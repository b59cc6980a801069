pub mod audit;
pub mod documents;
pub mod system;
