//! 轮盘跳棋宿主
//!
//! 包含:
//! - 游戏设置
//! - 回合计时
//! - 对局控制（点击选择、超时惩罚、AI 回合）
//! - AI 计算任务
//! - 终端命令

pub mod command;
pub mod session;
pub mod settings;
pub mod timer;
pub mod worker;

pub use command::{Command, CommandError, HELP};
pub use session::{AiReply, AiResolution, AiTicket, GameSession, IgnoreReason, TapOutcome};
pub use settings::GameSettings;
pub use timer::TurnTimer;
pub use worker::AiWorker;
