pub mod application;
pub mod index;
pub mod package;
pub mod query;
pub mod render;
pub mod report;
pub mod runtime;
pub mod site;
