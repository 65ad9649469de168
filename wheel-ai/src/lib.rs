//! 轮盘跳棋 AI 引擎
//!
//! 包含:
//! - 局面评估函数
//! - Minimax + Alpha-Beta 搜索（带截止时间）
//! - 三档难度配置

mod evaluate;
mod search;

pub use evaluate::{Evaluator, CAPTURE_BONUS, CENTER_BONUS, KING_VALUE, MAN_VALUE};
pub use search::{AiConfig, AiEngine, Difficulty, NODE_CANDIDATES};
