//! 搜索引擎
//!
//! Minimax + Alpha-Beta 剪枝，带截止时间

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wheel_protocol::{GameState, Move, Rules, Side};

use crate::evaluate::Evaluator;

// 重导出 Difficulty 以便外部使用
pub use wheel_protocol::Difficulty;

/// 内部节点最多展开的走法数
pub const NODE_CANDIDATES: usize = 8;

/// AI 配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// 根节点走法之后继续搜索的层数；0 表示不搜索
    pub max_depth: u8,
    /// 搜索时间预算
    pub time_limit_ms: u64,
    /// 根节点最多考虑的走法数
    pub root_candidates: usize,
    /// 根节点走法是否按吃子优先排序
    pub captures_first: bool,
    /// 宿主展示“思考中”的最短时间，不小于搜索预算
    pub think_window_ms: u64,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                difficulty,
                max_depth: 0,
                time_limit_ms: 0,
                root_candidates: 0,
                captures_first: true,
                think_window_ms: 1200,
            },
            Difficulty::Mid => Self {
                difficulty,
                max_depth: 1,
                time_limit_ms: 1500,
                root_candidates: 6,
                captures_first: false,
                think_window_ms: 2000,
            },
            Difficulty::Hard => Self {
                difficulty,
                max_depth: 2,
                time_limit_ms: 2000,
                root_candidates: 8,
                captures_first: true,
                think_window_ms: 3200,
            },
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Mid)
    }
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    rng: ChaCha8Rng,
    nodes_searched: u64,
    last_score: Option<i32>,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::from_entropy(),
            nodes_searched: 0,
            last_score: None,
        }
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    /// 使用固定种子（简单难度的随机选择可复现）
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 宿主展示“思考中”的最短时间
    pub fn think_window(&self) -> Duration {
        Duration::from_millis(self.config.think_window_ms)
    }

    /// 为 `side` 选择走法
    ///
    /// `side` 不是走子方或没有合法走法时返回 None。
    /// 实际截止时间取 `deadline` 与搜索预算中较早的一个；超时后剩余分支直接使用静态评估。
    pub fn select_move(&mut self, state: &GameState, side: Side, deadline: Instant) -> Option<Move> {
        self.nodes_searched = 0;
        self.last_score = None;

        if state.turn != side {
            return None;
        }
        let moves = Rules::legal_moves(state);
        if moves.is_empty() {
            return None;
        }

        if self.config.difficulty == Difficulty::Easy {
            return self.pick_random(&moves);
        }

        let budget = Instant::now() + Duration::from_millis(self.config.time_limit_ms);
        let deadline = deadline.min(budget);

        let mut candidates = moves;
        if self.config.captures_first {
            // 稳定排序，保持生成顺序
            candidates.sort_by_key(|mv| !mv.is_jump());
        }
        candidates.truncate(self.config.root_candidates.max(1));

        let mut best_move = candidates[0];
        let mut best_score = i32::MIN;

        for mv in &candidates {
            if Instant::now() >= deadline {
                break;
            }

            let next = Rules::apply_move(state, *mv);
            let score = self.alpha_beta(&next, self.config.max_depth, best_score, i32::MAX, side, deadline);

            // 只在严格更优时替换，保留最先达到最高分的走法
            if score > best_score {
                best_score = score;
                best_move = *mv;
            }
        }

        if best_score > i32::MIN {
            self.last_score = Some(best_score);
        }
        debug!(
            "AI({}) 选择 {}，评分 {:?}，搜索节点 {}",
            self.config.difficulty, best_move, self.last_score, self.nodes_searched
        );

        Some(best_move)
    }

    /// 简单难度：有吃子时从吃子中随机，否则从所有走法中随机
    fn pick_random(&mut self, moves: &[Move]) -> Option<Move> {
        let captures: Vec<Move> = moves.iter().copied().filter(Move::is_jump).collect();
        let pool = if captures.is_empty() { moves } else { &captures[..] };
        pool.choose(&mut self.rng).copied()
    }

    /// Alpha-Beta 搜索
    ///
    /// 分值始终以 `side` 视角计算；走子方为 `side` 时取最大，否则取最小。
    /// 连续吃子时走子方不变，因此同一玩家可以连续多层取最大。
    fn alpha_beta(
        &mut self,
        state: &GameState,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        side: Side,
        deadline: Instant,
    ) -> i32 {
        self.nodes_searched += 1;

        // 超时时返回当前静态评估值
        if Instant::now() >= deadline {
            return Evaluator::evaluate(state, side);
        }

        if depth == 0 || Rules::is_terminal(state) {
            return Evaluator::evaluate(state, side);
        }

        let moves = Rules::legal_moves(state);
        let maximizing = state.turn == side;

        if maximizing {
            let mut best = i32::MIN;
            for mv in moves.into_iter().take(NODE_CANDIDATES) {
                let next = Rules::apply_move(state, mv);
                let score = self.alpha_beta(&next, depth - 1, alpha, beta, side, deadline);
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break; // Beta 剪枝
                }
            }
            best
        } else {
            let mut best = i32::MAX;
            for mv in moves.into_iter().take(NODE_CANDIDATES) {
                let next = Rules::apply_move(state, mv);
                let score = self.alpha_beta(&next, depth - 1, alpha, beta, side, deadline);
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break; // Alpha 剪枝
                }
            }
            best
        }
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// 上一次搜索的最佳评分（简单难度不搜索，为 None）
    pub fn last_score(&self) -> Option<i32> {
        self.last_score
    }
}
