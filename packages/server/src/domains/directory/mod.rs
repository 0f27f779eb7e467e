pub mod client;

pub use client::{BaseProfileDirectory, DirectoryError, HttpProfileDirectory};
