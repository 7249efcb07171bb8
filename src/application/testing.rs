//! 测试用端口实现
//!
//! 只在单元测试中编译，按调用记录行为，便于断言“哪些阶段被执行过”。

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{
    AudioFetcherPort, ChatHostPort, ClipStoreError, FetchError, HostError, LocateError,
    MusicProviderPort, ResolveError, TranscodeConfig, TranscodeError, VoiceClipStorePort,
    VoiceTranscoderPort,
};
use crate::domain::chat::{MessagePart, ReplyTarget};
use crate::domain::song::{
    ResolvedTrack, SearchQuery, TrackCandidate, TrackId, TrackLocation,
};

/// 固定搜索结果的音乐源
pub struct FakeProvider {
    pub name: String,
    pub candidates: Vec<TrackCandidate>,
    /// None 表示直链失败
    pub location: Option<String>,
    pub searches: AtomicUsize,
    pub locates: AtomicUsize,
}

impl FakeProvider {
    pub fn new(name: &str, candidates: Vec<(&str, i64)>, location: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            candidates: candidates
                .into_iter()
                .map(|(id, fee)| TrackCandidate {
                    id: TrackId::new(id),
                    name: Some(format!("song-{}", id)),
                    fee: Some(fee),
                })
                .collect(),
            location: location.map(str::to_string),
            searches: AtomicUsize::new(0),
            locates: AtomicUsize::new(0),
        }
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    pub fn locates(&self) -> usize {
        self.locates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MusicProviderPort for FakeProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search_free_track(&self, _query: &SearchQuery) -> Result<ResolvedTrack, ResolveError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.candidates.is_empty() {
            return Err(ResolveError::NoResults);
        }
        let chosen = TrackCandidate::first_free(&self.candidates).ok_or(ResolveError::PaidOnly {
            candidates: self.candidates.len(),
        })?;
        Ok(ResolvedTrack {
            provider: self.name.clone(),
            id: chosen.id.clone(),
            name: chosen.name.clone(),
        })
    }

    async fn locate_stream(&self, _track: &ResolvedTrack) -> Result<TrackLocation, LocateError> {
        self.locates.fetch_add(1, Ordering::SeqCst);
        self.location
            .as_ref()
            .map(TrackLocation::new)
            .ok_or(LocateError::NotRedirected { status: 200 })
    }
}

/// 把固定字节写入目标文件的下载器
pub struct FakeFetcher {
    pub body: Vec<u8>,
    pub fail: bool,
    pub delay: Duration,
    pub calls: AtomicUsize,
    pub paths: Mutex<Vec<PathBuf>>,
}

impl FakeFetcher {
    pub fn new(body: &[u8]) -> Self {
        Self {
            body: body.to_vec(),
            fail: false,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            paths: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(b"")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioFetcherPort for FakeFetcher {
    async fn download(
        &self,
        _location: &TrackLocation,
        dest_dir: &Path,
        filename: &str,
    ) -> Result<PathBuf, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FetchError::Status { status: 404 });
        }
        tokio::fs::create_dir_all(dest_dir)
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;
        let path = dest_dir.join(filename);
        tokio::fs::write(&path, &self.body)
            .await
            .map_err(|e| FetchError::Io(e.to_string()))?;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.paths.lock().unwrap().push(path.clone());
        Ok(path)
    }
}

/// 把源文件内容加前缀写成“silk”的转码器
pub struct FakeTranscoder {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeTranscoder {
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoiceTranscoderPort for FakeTranscoder {
    async fn transcode(
        &self,
        source: &Path,
        dest: &Path,
        _config: &TranscodeConfig,
    ) -> Result<PathBuf, TranscodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TranscodeError::ProcessFailed {
                tool: "silk_v3_encoder".to_string(),
                status: "exit status: 1".to_string(),
                stderr: String::new(),
            });
        }
        let source_data = tokio::fs::read(source)
            .await
            .map_err(|e| TranscodeError::Io(e.to_string()))?;
        let mut silk = b"SILK:".to_vec();
        silk.extend_from_slice(&source_data);
        tokio::fs::write(dest, silk)
            .await
            .map_err(|e| TranscodeError::Io(e.to_string()))?;
        Ok(dest.to_path_buf())
    }
}

/// 记录所有发出消息的宿主
#[derive(Default)]
pub struct RecordingHost {
    pub sent: Mutex<Vec<(ReplyTarget, Vec<MessagePart>)>>,
    pub fail: bool,
}

impl RecordingHost {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<(ReplyTarget, Vec<MessagePart>)> {
        self.sent.lock().unwrap().clone()
    }

    /// 所有纯文本片段
    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .flat_map(|(_, parts)| parts)
            .filter_map(|p| match p {
                MessagePart::Plain(text) => Some(text),
                MessagePart::Voice(_) => None,
            })
            .collect()
    }

    /// 语音片段数量
    pub fn voice_count(&self) -> usize {
        self.sent()
            .into_iter()
            .flat_map(|(_, parts)| parts)
            .filter(|p| matches!(p, MessagePart::Voice(_)))
            .count()
    }
}

#[async_trait]
impl ChatHostPort for RecordingHost {
    async fn send_message(
        &self,
        target: &ReplyTarget,
        parts: Vec<MessagePart>,
    ) -> Result<(), HostError> {
        self.sent.lock().unwrap().push((target.clone(), parts));
        if self.fail {
            return Err(HostError::Network("connection refused".to_string()));
        }
        Ok(())
    }
}

/// 内存中的内置语音
pub struct FakeClipStore {
    pub clips: Vec<(String, Vec<u8>)>,
}

impl FakeClipStore {
    pub fn new(clips: &[(&str, &[u8])]) -> Self {
        Self {
            clips: clips
                .iter()
                .map(|(name, data)| (name.to_string(), data.to_vec()))
                .collect(),
        }
    }
}

#[async_trait]
impl VoiceClipStorePort for FakeClipStore {
    async fn load(&self, file: &str) -> Result<Vec<u8>, ClipStoreError> {
        self.clips
            .iter()
            .find(|(name, _)| name == file)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| ClipStoreError::NotFound(file.to_string()))
    }

    async fn exists(&self, file: &str) -> bool {
        self.clips.iter().any(|(name, _)| name == file)
    }
}

/// 目录下剩余的条目数（目录不存在视为 0）
pub fn entry_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|it| it.count()).unwrap_or(0)
}
