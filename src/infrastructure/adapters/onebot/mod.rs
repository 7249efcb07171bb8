//! OneBot v11 Adapter

mod onebot_client;

pub use onebot_client::{OneBotClient, OneBotConfig};
