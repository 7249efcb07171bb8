//! 应用服务
//!
//! 跨命令复用的编排逻辑：多音乐源解析、消息触发分发

mod message_responder;
mod track_resolver;

pub use message_responder::{Disposition, MessageResponder, ResponseOutcome, SharedResponder};
pub use track_resolver::TrackResolver;
