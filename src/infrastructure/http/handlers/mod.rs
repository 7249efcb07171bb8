//! HTTP Handlers

mod onebot;
mod ping;
mod status;

pub use onebot::*;
pub use ping::*;
pub use status::*;
