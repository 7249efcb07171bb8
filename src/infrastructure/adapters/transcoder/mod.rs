//! Transcoder Adapters

mod silk_transcoder;

pub use silk_transcoder::{check_tools, SilkTranscoder};
