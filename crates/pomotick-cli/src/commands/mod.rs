pub mod completions;
pub mod config;
pub mod message;
pub mod run;
