//! 错误类型定义

use thiserror::Error;

/// 规则错误
///
/// 规则引擎本身从不因非法输入而崩溃：`Rules::apply_move` 对畸形走法原样返回输入状态，
/// 这里的错误只由带检查的入口（`Rules::play`、解析函数、棋谱回放）返回给宿主。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    /// 无效的节点名
    #[error("Invalid node: {name:?}")]
    InvalidNode { name: String },

    /// 不在合法走法列表中的走法
    #[error("Illegal move: {notation}")]
    IllegalMove { notation: String },

    /// 起点没有棋子
    #[error("No piece at {node}")]
    NoPiece { node: String },

    /// 不是该方的回合
    #[error("Not your turn")]
    NotYourTurn,

    /// 无效的局面字符串
    #[error("Invalid FEN string: {reason}")]
    InvalidFen { reason: String },

    /// 无效的走法记号
    #[error("Invalid move notation: {text:?}")]
    InvalidNotation { text: String },

    /// 棋谱中的超时记录与局面不符
    #[error("Invalid timeout event: {reason}")]
    InvalidTimeout { reason: String },

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,
}

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// JSON 序列化错误
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 记录版本不匹配
    #[error("Record version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },

    /// 规则错误
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;
