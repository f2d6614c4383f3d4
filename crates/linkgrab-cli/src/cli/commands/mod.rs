//! Mode handlers. Each mode is in its own file.

mod download;
mod dry;
mod list;

pub use download::run_download;
pub use dry::run_dry;
pub use list::run_list;

#[cfg(test)]
pub(crate) use list::listing_lines;
