pub mod common;
pub mod dump;
pub mod modules;
pub mod render;
pub mod resolve;
pub mod types;
