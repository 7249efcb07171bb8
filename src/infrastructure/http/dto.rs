//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::chat::IncomingMessage;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Status DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    /// 按尝试顺序排列的音乐源
    pub providers: Vec<String>,
    /// 不存在的外部工具
    pub missing_tools: Vec<String>,
    pub scratch: ScratchUsage,
}

#[derive(Debug, Serialize)]
pub struct ScratchUsage {
    pub workspaces: u64,
    pub files: u64,
    pub bytes: u64,
}

// ============================================================================
// OneBot v11 DTOs
// ============================================================================

/// OneBot 上报事件（只解析用到的字段）
#[derive(Debug, Deserialize)]
pub struct OneBotEvent {
    pub post_type: String,
    #[serde(default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub self_id: Option<Value>,
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub group_id: Option<Value>,
    /// 消息段数组，或 CQ 码字符串
    #[serde(default)]
    pub message: Value,
    #[serde(default)]
    pub raw_message: Option<String>,
}

/// 字符串或数字形式的 ID
fn id_string(v: &Option<Value>) -> Option<String> {
    match v.as_ref()? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl OneBotEvent {
    /// 消息中的纯文本部分
    pub fn plain_text(&self) -> String {
        match &self.message {
            Value::Array(segments) => segments
                .iter()
                .filter(|seg| seg["type"] == "text")
                .filter_map(|seg| seg["data"]["text"].as_str())
                .collect(),
            Value::String(text) => text.clone(),
            _ => self.raw_message.clone().unwrap_or_default(),
        }
    }

    /// 转换为领域消息；非消息事件、自身消息返回 None
    pub fn into_incoming(self) -> Option<IncomingMessage> {
        if self.post_type != "message" {
            return None;
        }

        let sender = id_string(&self.user_id)?;
        if id_string(&self.self_id).as_deref() == Some(sender.as_str()) {
            return None;
        }

        let text = self.plain_text();
        match self.message_type.as_deref()? {
            "private" => Some(IncomingMessage::person(sender, text)),
            "group" => {
                let group = id_string(&self.group_id)?;
                Some(IncomingMessage::group(group, sender, text))
            }
            _ => None,
        }
    }
}

/// 快速操作响应：阻止事件继续传递
#[derive(Debug, Serialize)]
pub struct QuickOperation {
    pub block: bool,
}

impl QuickOperation {
    pub fn block() -> Self {
        Self { block: true }
    }
}
