//! 棋盘与规则常量

/// 每个环上的节点数（也是辐条数）
pub const RING_SIZE: usize = 12;

/// 同心环数量
pub const RING_COUNT: usize = 4;

/// 节点总数：4 个环 × 12 + 中心
pub const NODE_COUNT: usize = RING_COUNT * RING_SIZE + 1;

/// 中心节点索引
pub const CENTER_INDEX: usize = NODE_COUNT - 1;

/// 每条辐条的节点数：O, MO, MI, I, C, I', MI', MO', O'
pub const SPOKE_LEN: usize = 2 * RING_COUNT + 1;

/// 开局每方棋子数
pub const PIECES_PER_SIDE: usize = 24;

/// A 方开局占据的环上索引（含）
pub const SIDE_A_INDICES: std::ops::Range<usize> = 0..6;

/// B 方开局占据的环上索引
pub const SIDE_B_INDICES: std::ops::Range<usize> = 6..12;

/// 默认每回合时长（秒）
pub const DEFAULT_TURN_SECS: u64 = 14;

/// 每回合时长下限（秒）
pub const MIN_TURN_SECS: u64 = 5;

/// 每回合时长上限（秒）
pub const MAX_TURN_SECS: u64 = 30;
