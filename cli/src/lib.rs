pub mod integration;
pub mod passage;
