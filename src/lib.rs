#![doc = include_str!("../README.md")]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod page;
pub mod selectors;
pub mod tools;
pub mod types;


pub use config::*;
pub use engine::*;
pub use error::*;
pub use types::*;
