//! 轮盘跳棋共享规则库
//!
//! 包含:
//! - 节点、拓扑、棋子、棋盘等核心数据结构
//! - 走法生成和规则引擎（强制吃子、连续吃子、升变、超时惩罚）
//! - 局面文本格式与走法记号
//! - 棋谱格式 (JSON)

mod board;
mod constants;
mod error;
mod fen;
mod moves;
mod node;
mod notation;
mod outcome;
mod piece;
mod record;
mod rules;
mod topology;

pub use board::{Board, GameState, Snapshot};
pub use constants::*;
pub use error::{RuleError, ProtocolError, Result};
pub use fen::{Fen, INITIAL_FEN};
pub use moves::{Move, MoveGenerator};
pub use node::{NodeId, Ring};
pub use notation::Notation;
pub use outcome::{Difficulty, FinalScore, GameOutcome, GameResult, WinReason};
pub use piece::{Piece, PieceKind, Side};
pub use record::{GameMetadata, GameRecord, RecordEvent, RECORD_VERSION};
pub use rules::{Rules, TimeoutOutcome};
pub use topology::{Line, Topology};
