//! 棋谱记录格式
//!
//! 内存中的走法列表之外，额外记录超时事件，便于导出和校验回放。

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::board::GameState;
use crate::constants::DEFAULT_TURN_SECS;
use crate::error::{RuleError, ProtocolError};
use crate::fen::{Fen, INITIAL_FEN};
use crate::moves::Move;
use crate::outcome::{Difficulty, GameOutcome};
use crate::piece::Side;
use crate::rules::{Rules, TimeoutOutcome};

/// 棋谱版本
pub const RECORD_VERSION: &str = "1.0";

/// 游戏元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    /// A 方玩家名
    pub player_a: String,
    /// B 方玩家名
    pub player_b: String,
    /// 游戏日期
    pub date: String,
    /// 游戏结果
    pub result: Option<GameOutcome>,
    /// 每回合时长（秒）
    pub turn_secs: u64,
    /// AI 难度（人机模式）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_difficulty: Option<Difficulty>,
    /// AI 执哪一方
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_side: Option<Side>,
}

/// 棋谱中的一个事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum RecordEvent {
    /// 一步走法（连续吃子的每一跳单独记录）
    Move(Move),
    /// 计时到期
    Timeout(TimeoutOutcome),
}

/// 完整的棋谱记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// 版本号
    pub version: String,
    /// 元数据
    pub metadata: GameMetadata,
    /// 初始局面
    pub initial_fen: String,
    /// 事件列表
    pub events: Vec<RecordEvent>,
}

impl GameRecord {
    /// 创建新的棋谱记录
    pub fn new(player_a: String, player_b: String) -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            metadata: GameMetadata {
                player_a,
                player_b,
                date: Utc::now().format("%Y-%m-%d").to_string(),
                result: None,
                turn_secs: DEFAULT_TURN_SECS,
                ai_difficulty: None,
                ai_side: None,
            },
            initial_fen: INITIAL_FEN.to_string(),
            events: Vec::new(),
        }
    }

    /// 从自定义局面创建
    pub fn from_fen(player_a: String, player_b: String, fen: String) -> Self {
        let mut record = Self::new(player_a, player_b);
        record.initial_fen = fen;
        record
    }

    /// 设置 AI
    pub fn set_ai(&mut self, side: Side, difficulty: Difficulty) {
        self.metadata.ai_side = Some(side);
        self.metadata.ai_difficulty = Some(difficulty);
    }

    /// 设置每回合时长
    pub fn set_turn_secs(&mut self, secs: u64) {
        self.metadata.turn_secs = secs;
    }

    /// 添加走法
    pub fn add_move(&mut self, mv: Move) {
        self.events.push(RecordEvent::Move(mv));
    }

    /// 添加超时事件
    pub fn add_timeout(&mut self, outcome: TimeoutOutcome) {
        self.events.push(RecordEvent::Timeout(outcome));
    }

    /// 设置游戏结果
    pub fn set_result(&mut self, result: GameOutcome) {
        self.metadata.result = Some(result);
    }

    /// 走法数（不含超时）
    pub fn move_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, RecordEvent::Move(_)))
            .count()
    }

    /// 从头重放所有事件，遇到第一个非法事件即失败
    pub fn replay(&self) -> Result<GameState, RuleError> {
        let mut state = Fen::parse(&self.initial_fen)?;
        for event in &self.events {
            state = match event {
                RecordEvent::Move(mv) => Rules::play(&state, *mv)?,
                RecordEvent::Timeout(outcome) => Rules::replay_timeout(&state, outcome)?,
            };
        }
        Ok(state)
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析，并检查版本
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let record: Self = serde_json::from_str(json)?;
        if record.version != RECORD_VERSION {
            return Err(ProtocolError::VersionMismatch {
                expected: RECORD_VERSION.to_string(),
                actual: record.version,
            });
        }
        Ok(record)
    }
}
