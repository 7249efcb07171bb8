//! Chat Context - 触发词
//!
//! 匹配顺序固定：先整句匹配内置语音，再匹配点歌关键词。

use regex::Regex;

/// 整句匹配的内置语音触发
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipTrigger {
    /// 触发短语（整句完全相等）
    pub phrase: String,
    /// 语音目录下的文件名
    pub file: String,
}

/// 一条消息命中的触发
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// 发送内置语音
    Clip(ClipTrigger),
    /// 点歌，携带关键词之后的原始歌名（未裁剪）
    Song { title: String },
}

/// 触发词集合
#[derive(Debug, Clone)]
pub struct TriggerSet {
    keyword: String,
    song_pattern: Regex,
    clips: Vec<ClipTrigger>,
}

impl TriggerSet {
    pub fn new(keyword: &str, clips: Vec<ClipTrigger>) -> Result<Self, regex::Error> {
        // 贪婪前缀：歌名取最后一个关键词之后的内容
        let song_pattern = Regex::new(&format!("(?s)^(.*){}(.*)$", regex::escape(keyword)))?;
        Ok(Self {
            keyword: keyword.to_string(),
            song_pattern,
            clips,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn clips(&self) -> &[ClipTrigger] {
        &self.clips
    }

    pub fn matches(&self, text: &str) -> Option<Trigger> {
        if let Some(clip) = self.clips.iter().find(|c| c.phrase == text) {
            return Some(Trigger::Clip(clip.clone()));
        }

        self.song_pattern.captures(text).map(|caps| Trigger::Song {
            title: caps.get(2).map_or("", |m| m.as_str()).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triggers() -> TriggerSet {
        TriggerSet::new(
            "点歌",
            vec![
                ClipTrigger {
                    phrase: "乓啪咔乓乓乓".to_string(),
                    file: "200.silk".to_string(),
                },
                ClipTrigger {
                    phrase: "唱歌".to_string(),
                    file: "sing.silk".to_string(),
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_song_title_after_keyword() {
        let trigger = triggers().matches("点歌 晴天");
        assert_eq!(
            trigger,
            Some(Trigger::Song {
                title: " 晴天".to_string()
            })
        );
    }

    #[test]
    fn test_song_keyword_anywhere() {
        let trigger = triggers().matches("@bot 帮我点歌七里香");
        assert_eq!(
            trigger,
            Some(Trigger::Song {
                title: "七里香".to_string()
            })
        );
    }

    #[test]
    fn test_song_title_uses_last_keyword() {
        let trigger = triggers().matches("点歌点歌稻香");
        assert_eq!(
            trigger,
            Some(Trigger::Song {
                title: "稻香".to_string()
            })
        );
    }

    #[test]
    fn test_keyword_only_gives_empty_title() {
        assert_eq!(
            triggers().matches("点歌"),
            Some(Trigger::Song {
                title: String::new()
            })
        );
    }

    #[test]
    fn test_clip_exact_match() {
        match triggers().matches("唱歌") {
            Some(Trigger::Clip(clip)) => assert_eq!(clip.file, "sing.silk"),
            other => panic!("unexpected trigger: {:?}", other),
        }
    }

    #[test]
    fn test_clip_takes_precedence_over_song() {
        let set = TriggerSet::new(
            "点歌",
            vec![ClipTrigger {
                phrase: "点歌吧".to_string(),
                file: "sing.silk".to_string(),
            }],
        )
        .unwrap();
        assert!(matches!(set.matches("点歌吧"), Some(Trigger::Clip(_))));
        assert!(matches!(set.matches("点歌吧 "), Some(Trigger::Song { .. })));
    }

    #[test]
    fn test_clip_requires_whole_message() {
        assert_eq!(triggers().matches("我想听你唱歌呀"), None);
    }

    #[test]
    fn test_no_trigger() {
        assert_eq!(triggers().matches("今天天气不错"), None);
    }

    #[test]
    fn test_keyword_is_escaped() {
        let set = TriggerSet::new("song.", Vec::new()).unwrap();
        assert!(set.matches("songX abc").is_none());
        assert!(set.matches("song. abc").is_some());
    }
}
