//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod fetcher;
pub mod netease;
pub mod onebot;
pub mod storage;
pub mod transcoder;

pub use fetcher::*;
pub use netease::*;
pub use onebot::*;
pub use storage::*;
pub use transcoder::*;
