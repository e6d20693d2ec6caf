pub mod document;
pub mod task;
pub mod verification;
