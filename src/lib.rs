pub mod cli;
pub mod error;
pub mod models;
pub mod preview;
pub mod processors;
pub mod readers;
pub mod store;
pub mod utils;

pub use error::{ImportError, Result};
