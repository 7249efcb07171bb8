//! File Voice Clip Store - 内置语音目录
//!
//! 实现 VoiceClipStorePort trait，只允许读取目录内的单层文件名

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::application::ports::{ClipStoreError, VoiceClipStorePort};

/// 文件系统内置语音
pub struct FileVoiceClipStore {
    voice_dir: PathBuf,
}

impl FileVoiceClipStore {
    pub fn new(voice_dir: impl AsRef<Path>) -> Self {
        Self {
            voice_dir: voice_dir.as_ref().to_path_buf(),
        }
    }

    pub fn voice_dir(&self) -> &Path {
        &self.voice_dir
    }

    fn clip_path(&self, file: &str) -> Result<PathBuf, ClipStoreError> {
        let mut components = Path::new(file).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.voice_dir.join(file)),
            _ => Err(ClipStoreError::InvalidName(file.to_string())),
        }
    }
}

#[async_trait]
impl VoiceClipStorePort for FileVoiceClipStore {
    async fn load(&self, file: &str) -> Result<Vec<u8>, ClipStoreError> {
        let path = self.clip_path(file)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ClipStoreError::NotFound(path.to_string_lossy().to_string()))
            }
            Err(e) => Err(ClipStoreError::Io(e.to_string())),
        }
    }

    async fn exists(&self, file: &str) -> bool {
        match self.clip_path(file) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}
