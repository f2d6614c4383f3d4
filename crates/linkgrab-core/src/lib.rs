pub mod config;
pub mod logging;

pub mod control;
pub mod downloader;
pub mod error;
pub mod extract;
pub mod fetch_head;
mod http;
pub mod item;
pub mod storage;
pub mod url_model;

pub use error::{Error, FetchError, Result};
pub use item::Item;
