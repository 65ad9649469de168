//! 对局结果与难度

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::piece::Side;

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 简单：随机走子，有吃子时优先吃子
    Easy,
    /// 中等：深度 1
    #[default]
    Mid,
    /// 困难：深度 2，吃子优先排序
    Hard,
}

impl Difficulty {
    /// 所有选项
    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Mid, Difficulty::Hard]
    }

    /// 设置文件与命令行中使用的名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Mid => "mid",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "mid" | "medium" => Ok(Difficulty::Mid),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 胜利原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// 对方棋子被吃光
    AllCaptured,
    /// 对方无子可动
    Blocked,
}

/// 游戏结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// A 方胜
    AWin(WinReason),
    /// B 方胜
    BWin(WinReason),
}

impl GameResult {
    /// 构造指定胜方的结果
    pub fn win(side: Side, reason: WinReason) -> Self {
        match side {
            Side::A => GameResult::AWin(reason),
            Side::B => GameResult::BWin(reason),
        }
    }

    /// 胜方
    pub fn winner(&self) -> Side {
        match self {
            GameResult::AWin(_) => Side::A,
            GameResult::BWin(_) => Side::B,
        }
    }

    /// 胜利原因
    pub fn reason(&self) -> WinReason {
        match self {
            GameResult::AWin(reason) | GameResult::BWin(reason) => *reason,
        }
    }
}

/// 终局剩余棋子数（用于结算界面和排行榜）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub a: usize,
    pub b: usize,
}

/// 终局信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub result: GameResult,
    pub score: FinalScore,
}
