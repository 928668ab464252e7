pub mod analyze;
pub mod batch;
pub mod compare;
pub mod demo;
pub mod version;
