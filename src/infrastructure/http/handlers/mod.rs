//! HTTP Handlers

mod book;
mod chapter;
mod ping;

pub use book::*;
pub use chapter::*;
pub use ping::*;
