//! OneBot Client - 通过 OneBot v11 HTTP API 发送消息
//!
//! 实现 ChatHostPort trait
//!
//! 外部 API:
//! POST <api_base>/send_private_msg  {"user_id": 10001, "message": [...]}
//! POST <api_base>/send_group_msg    {"group_id": 20002, "message": [...]}
//! Response: {"status": "ok", "retcode": 0, "data": {"message_id": 1}}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::application::ports::{ChatHostPort, HostError};
use crate::domain::chat::{MessagePart, ReplyTarget, Surface};

/// OneBot 客户端配置
#[derive(Debug, Clone)]
pub struct OneBotConfig {
    /// OneBot 实现的 HTTP API 地址
    pub api_base_url: String,
    /// access_token，存在时以 Bearer 方式携带
    pub access_token: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for OneBotConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5700".to_string(),
            access_token: None,
            timeout_secs: 30,
        }
    }
}

/// OneBot 消息段
#[derive(Debug, Serialize, PartialEq)]
struct Segment {
    #[serde(rename = "type")]
    kind: &'static str,
    data: Value,
}

impl From<MessagePart> for Segment {
    fn from(part: MessagePart) -> Self {
        match part {
            MessagePart::Plain(text) => Segment {
                kind: "text",
                data: json!({ "text": text }),
            },
            MessagePart::Voice(payload) => Segment {
                kind: "record",
                data: json!({ "file": payload.to_file_uri() }),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    retcode: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    wording: Option<String>,
}

/// QQ 号/群号优先按数字发送，非数字原样透传
fn id_value(id: &str) -> Value {
    id.parse::<i64>().map(Value::from).unwrap_or_else(|_| Value::from(id))
}

/// OneBot HTTP 客户端
pub struct OneBotClient {
    client: Client,
    config: OneBotConfig,
}

impl OneBotClient {
    pub fn new(config: OneBotConfig) -> Result<Self, HostError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HostError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn action_url(&self, action: &str) -> String {
        format!("{}/{}", self.config.api_base_url.trim_end_matches('/'), action)
    }

    /// 构造发送动作及请求体
    fn build_request(target: &ReplyTarget, parts: Vec<MessagePart>) -> (&'static str, Value) {
        let message: Vec<Segment> = parts.into_iter().map(Segment::from).collect();
        match target.surface {
            Surface::Person => (
                "send_private_msg",
                json!({ "user_id": id_value(&target.target_id), "message": message }),
            ),
            Surface::Group => (
                "send_group_msg",
                json!({ "group_id": id_value(&target.target_id), "message": message }),
            ),
        }
    }
}

#[async_trait]
impl ChatHostPort for OneBotClient {
    async fn send_message(
        &self,
        target: &ReplyTarget,
        parts: Vec<MessagePart>,
    ) -> Result<(), HostError> {
        let (action, body) = Self::build_request(target, parts);

        let mut request = self.client.post(self.action_url(action)).json(&body);
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                HostError::Network(format!("Cannot connect to OneBot API: {}", e))
            } else {
                HostError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(HostError::InvalidResponse(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let reply: ApiResponse = response
            .json()
            .await
            .map_err(|e| HostError::InvalidResponse(e.to_string()))?;

        if reply.retcode != 0 {
            return Err(HostError::Rejected {
                retcode: reply.retcode,
                message: reply.wording.or(reply.msg).unwrap_or(reply.status),
            });
        }

        tracing::debug!(reply_to = %target, action, "OneBot message sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::song::VoicePayload;
    use httpmock::Method::POST;
    use httpmock::MockServer;

    fn client(server: &MockServer, token: Option<&str>) -> OneBotClient {
        OneBotClient::new(OneBotConfig {
            api_base_url: server.base_url(),
            access_token: token.map(str::to_string),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_group_voice_request_body() {
        let (action, body) = OneBotClient::build_request(
            &ReplyTarget::group("20002"),
            vec![MessagePart::Voice(VoicePayload::from_bytes(b"silk"))],
        );

        assert_eq!(action, "send_group_msg");
        assert_eq!(
            body,
            json!({
                "group_id": 20002,
                "message": [{ "type": "record", "data": { "file": "base64://c2lsaw==" } }]
            })
        );
    }

    #[test]
    fn test_non_numeric_id_passes_through() {
        let (action, body) = OneBotClient::build_request(
            &ReplyTarget::person("u_abc"),
            vec![MessagePart::plain("未找到该歌曲")],
        );

        assert_eq!(action, "send_private_msg");
        assert_eq!(body["user_id"], json!("u_abc"));
        assert_eq!(
            body["message"][0],
            json!({ "type": "text", "data": { "text": "未找到该歌曲" } })
        );
    }

    #[tokio::test]
    async fn test_send_private_text_with_token() {
        let server = MockServer::start();
        let api = server.mock(|when, then| {
            when.method(POST)
                .path("/send_private_msg")
                .header("authorization", "Bearer secret")
                .json_body(json!({
                    "user_id": 10001,
                    "message": [{ "type": "text", "data": { "text": "获取歌曲链接失败" } }]
                }));
            then.status(200)
                .json_body(json!({ "status": "ok", "retcode": 0, "data": { "message_id": 1 } }));
        });

        client(&server, Some("secret"))
            .send_message(
                &ReplyTarget::person("10001"),
                vec![MessagePart::plain("获取歌曲链接失败")],
            )
            .await
            .unwrap();

        api.assert();
    }

    #[tokio::test]
    async fn test_nonzero_retcode_is_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/send_group_msg");
            then.status(200).json_body(json!({
                "status": "failed",
                "retcode": 1200,
                "wording": "群消息发送失败"
            }));
        });

        let err = client(&server, None)
            .send_message(&ReplyTarget::group("20002"), vec![MessagePart::plain("hi")])
            .await
            .unwrap_err();

        match err {
            HostError::Rejected { retcode, message } => {
                assert_eq!(retcode, 1200);
                assert_eq!(message, "群消息发送失败");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_error_is_invalid_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/send_group_msg");
            then.status(401).body("unauthorized");
        });

        let err = client(&server, None)
            .send_message(&ReplyTarget::group("20002"), vec![MessagePart::plain("hi")])
            .await
            .unwrap_err();

        assert!(matches!(err, HostError::InvalidResponse(_)));
    }
}
