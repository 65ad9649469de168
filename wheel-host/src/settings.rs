//! 游戏设置
//!
//! 保存在 `<配置目录>/wheel-checkers/settings.json`，文件不存在时使用默认值。

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wheel_protocol::{Difficulty, Side, DEFAULT_TURN_SECS, MAX_TURN_SECS, MIN_TURN_SECS};

/// 游戏设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// AI 难度
    pub difficulty: Difficulty,
    /// 每回合时长（秒），范围 5..=30
    pub timer_duration_secs: u64,
    /// AI 执哪一方；None 为双人对战
    pub ai_side: Option<Side>,
    /// 玩家名
    pub player_name: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            timer_duration_secs: DEFAULT_TURN_SECS,
            ai_side: Some(Side::B),
            player_name: "Player".to_string(),
        }
    }
}

impl GameSettings {
    /// 从默认位置加载
    pub fn load() -> Result<Self> {
        Self::load_from(&settings_path()?)
    }

    /// 从指定文件加载；文件不存在时返回默认值
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("设置文件不存在，使用默认设置: {:?}", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("读取设置文件失败: {:?}", path))?;
        let mut settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("解析设置文件失败: {:?}", path))?;

        let clamped = clamp_turn_secs(settings.timer_duration_secs);
        if clamped != settings.timer_duration_secs {
            warn!(
                "回合时长 {} 超出范围，调整为 {}",
                settings.timer_duration_secs, clamped
            );
            settings.timer_duration_secs = clamped;
        }

        Ok(settings)
    }

    /// 保存到默认位置
    pub fn save(&self) -> Result<()> {
        self.save_to(&settings_path()?)
    }

    /// 保存到指定文件
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("无法创建设置目录: {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(self).context("序列化设置失败")?;
        fs::write(path, content).with_context(|| format!("写入设置文件失败: {:?}", path))
    }

    /// 设置回合时长，返回实际生效（限制在范围内）的值
    pub fn set_timer_duration(&mut self, secs: u64) -> u64 {
        self.timer_duration_secs = clamp_turn_secs(secs);
        self.timer_duration_secs
    }

    /// 每回合时长
    pub fn turn_duration(&self) -> Duration {
        Duration::from_secs(self.timer_duration_secs)
    }

    /// 记录中使用的双方名称
    pub fn player_labels(&self) -> (String, String) {
        let label = |side: Side| {
            if self.ai_side == Some(side) {
                format!("AI-{}", self.difficulty)
            } else if self.ai_side.is_some() {
                self.player_name.clone()
            } else {
                format!("{}-{}", self.player_name, side)
            }
        };
        (label(Side::A), label(Side::B))
    }
}

fn clamp_turn_secs(secs: u64) -> u64 {
    secs.clamp(MIN_TURN_SECS, MAX_TURN_SECS)
}

/// 设置文件路径
fn settings_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("无法获取配置目录")?;
    Ok(config_dir.join("wheel-checkers").join("settings.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = GameSettings::default();
        assert_eq!(settings.difficulty, Difficulty::Mid);
        assert_eq!(settings.timer_duration_secs, 14);
        assert_eq!(settings.ai_side, Some(Side::B));
        assert_eq!(settings.turn_duration(), Duration::from_secs(14));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = GameSettings::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, GameSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = GameSettings::default();
        settings.difficulty = Difficulty::Hard;
        settings.ai_side = None;
        settings.set_timer_duration(20);
        settings.save_to(&path).unwrap();

        let loaded = GameSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_timer_clamped() {
        let mut settings = GameSettings::default();
        assert_eq!(settings.set_timer_duration(2), 5);
        assert_eq!(settings.set_timer_duration(99), 30);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"timer_duration_secs": 1000, "difficulty": "easy"}"#).unwrap();
        let loaded = GameSettings::load_from(&path).unwrap();
        assert_eq!(loaded.timer_duration_secs, 30);
        assert_eq!(loaded.difficulty, Difficulty::Easy);
        // 未写出的字段使用默认值
        assert_eq!(loaded.ai_side, Some(Side::B));
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        assert!(GameSettings::load_from(&path).is_err());
    }

    #[test]
    fn test_player_labels() {
        let settings = GameSettings::default();
        assert_eq!(settings.player_labels(), ("Player".to_string(), "AI-mid".to_string()));

        let local = GameSettings { ai_side: None, ..GameSettings::default() };
        assert_eq!(local.player_labels(), ("Player-A".to_string(), "Player-B".to_string()));
    }
}
