//! 规则引擎
//!
//! 隐式状态机：{等待 A 走子, 等待 B 走子, 终局}，由 `apply_move` 驱动。
//! 所有函数都接收不可变状态并返回新值。

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::{Board, GameState};
use crate::error::RuleError;
use crate::moves::{Move, MoveGenerator};
use crate::node::NodeId;
use crate::outcome::{FinalScore, GameOutcome, GameResult, WinReason};
use crate::piece::Side;
use crate::topology::Topology;

/// 超时处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TimeoutOutcome {
    /// 超时时存在必须的吃子：移除一枚本可吃子的棋子作为惩罚
    Penalized { side: Side, removed: NodeId },
    /// 没有必须的吃子：只交换走子方
    Passed { side: Side },
}

impl TimeoutOutcome {
    /// 超时的一方
    pub fn side(&self) -> Side {
        match *self {
            TimeoutOutcome::Penalized { side, .. } | TimeoutOutcome::Passed { side } => side,
        }
    }
}

/// 规则
pub struct Rules;

impl Rules {
    /// 当前走子方的合法走法
    ///
    /// 1. 连续吃子中：只能由 `must_continue_from` 上的棋子继续吃子
    /// 2. 存在吃子时必须吃子
    /// 3. 否则为普通移动
    pub fn legal_moves(state: &GameState) -> Vec<Move> {
        let side = state.turn;

        if let Some(node) = state.must_continue_from {
            return MoveGenerator::legal_jumps_from(&state.board, side, node);
        }

        let jumps = MoveGenerator::legal_jumps_all(&state.board, side);
        if !jumps.is_empty() {
            return jumps;
        }

        MoveGenerator::legal_steps(&state.board, side)
    }

    /// 执行走法，返回新状态
    ///
    /// 顺序固定：移除被吃棋子，检查升变，检查连续吃子。
    /// 畸形走法（起点无子、非当前走子方、终点被占、几何关系不成立）原样返回输入状态。
    /// 不检查走法是否在 `legal_moves` 中，需要检查时使用 `play`。
    pub fn apply_move(state: &GameState, mv: Move) -> GameState {
        if let Err(reason) = Self::check_well_formed(state, mv) {
            warn!("拒绝畸形走法 {}: {}", mv, reason);
            return state.clone();
        }

        let mut next = state.clone();
        let side = state.turn;

        let Some(mut piece) = next.board.take(mv.from()) else {
            return state.clone();
        };
        if let Move::Jump { over, .. } = mv {
            next.board.take(over);
        }

        // 到达中心即升变
        if mv.to().is_center() {
            piece = piece.promoted();
        }
        next.board.set(mv.to(), Some(piece));
        next.history.push(mv);

        if mv.is_jump() && !MoveGenerator::legal_jumps_from(&next.board, side, mv.to()).is_empty() {
            debug!("{} 必须从 {} 继续吃子", side, mv.to());
            next.must_continue_from = Some(mv.to());
        } else {
            next.must_continue_from = None;
            next.turn = side.opponent();
        }

        next
    }

    /// 带检查地执行走法
    ///
    /// 终局或走法不在合法列表中时返回错误，调用方保留原状态。
    pub fn play(state: &GameState, mv: Move) -> Result<GameState, RuleError> {
        if Self::has_eliminated_side(&state.board) {
            return Err(RuleError::GameOver);
        }

        let legal = Self::legal_moves(state);
        if legal.is_empty() {
            return Err(RuleError::GameOver);
        }
        if !legal.contains(&mv) {
            return Err(RuleError::IllegalMove {
                notation: mv.to_string(),
            });
        }

        Ok(Self::apply_move(state, mv))
    }

    /// 是否终局：任意一方无子，或走子方无合法走法
    pub fn is_terminal(state: &GameState) -> bool {
        Self::has_eliminated_side(&state.board) || Self::legal_moves(state).is_empty()
    }

    /// 胜方；未终局返回 None
    pub fn winner(state: &GameState) -> Option<Side> {
        Self::outcome(state).map(|o| o.result.winner())
    }

    /// 终局结果与剩余棋子数；未终局返回 None
    pub fn outcome(state: &GameState) -> Option<GameOutcome> {
        let score = FinalScore {
            a: state.board.count(Side::A),
            b: state.board.count(Side::B),
        };

        let result = if score.a == 0 {
            GameResult::win(Side::B, WinReason::AllCaptured)
        } else if score.b == 0 {
            GameResult::win(Side::A, WinReason::AllCaptured)
        } else if Self::legal_moves(state).is_empty() {
            GameResult::win(state.turn.opponent(), WinReason::Blocked)
        } else {
            return None;
        };

        Some(GameOutcome { result, score })
    }

    /// 走子方计时到期时的惩罚策略
    ///
    /// 若该方存在吃子走法，从可吃子的棋子中随机移除一枚，然后交换走子方；
    /// 否则只交换走子方。不执行吃子，不写入走法历史。
    pub fn apply_timeout<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> (GameState, TimeoutOutcome) {
        let side = state.turn;
        let outcome = match Self::penalty_candidates(state).choose(rng) {
            Some(&removed) => {
                warn!("{} 超时且有必须的吃子，移除 {}", side, removed);
                TimeoutOutcome::Penalized { side, removed }
            }
            None => {
                debug!("{} 超时，交换走子方", side);
                TimeoutOutcome::Passed { side }
            }
        };
        (Self::finish_timeout(state, &outcome), outcome)
    }

    /// 按记录重放一次超时，校验记录与局面一致
    pub fn replay_timeout(state: &GameState, outcome: &TimeoutOutcome) -> Result<GameState, RuleError> {
        if outcome.side() != state.turn {
            return Err(RuleError::InvalidTimeout {
                reason: format!("{} timed out but {} is to move", outcome.side(), state.turn),
            });
        }

        let candidates = Self::penalty_candidates(state);
        match *outcome {
            TimeoutOutcome::Penalized { removed, .. } if !candidates.contains(&removed) => {
                Err(RuleError::InvalidTimeout {
                    reason: format!("{} had no mandatory capture", removed),
                })
            }
            TimeoutOutcome::Passed { .. } if !candidates.is_empty() => Err(RuleError::InvalidTimeout {
                reason: "a mandatory capture was available".to_string(),
            }),
            _ => Ok(Self::finish_timeout(state, outcome)),
        }
    }

    /// 超时惩罚的候选棋子：走子方所有存在吃子走法的棋子（按节点顺序，无重复）
    pub fn penalty_candidates(state: &GameState) -> Vec<NodeId> {
        let mut candidates: Vec<NodeId> = Vec::new();
        for mv in MoveGenerator::legal_jumps_all(&state.board, state.turn) {
            if !candidates.contains(&mv.from()) {
                candidates.push(mv.from());
            }
        }
        candidates
    }

    fn finish_timeout(state: &GameState, outcome: &TimeoutOutcome) -> GameState {
        let mut next = state.clone();
        if let TimeoutOutcome::Penalized { removed, .. } = *outcome {
            next.board.take(removed);
        }
        next.must_continue_from = None;
        next.turn = state.turn.opponent();
        next
    }

    fn has_eliminated_side(board: &Board) -> bool {
        board.count(Side::A) == 0 || board.count(Side::B) == 0
    }

    /// 检查走法与棋盘的几何关系，不检查强制吃子
    fn check_well_formed(state: &GameState, mv: Move) -> Result<(), &'static str> {
        let board = &state.board;
        let topo = Topology::get();

        let piece = board.get(mv.from()).ok_or("no piece at origin")?;
        if piece.side != state.turn {
            return Err("piece does not belong to the side to move");
        }
        if mv.from() == mv.to() || !board.is_empty(mv.to()) {
            return Err("destination is not empty");
        }
        if let Some(node) = state.must_continue_from {
            if !mv.is_jump() || mv.from() != node {
                return Err("capture chain must continue");
            }
        }

        let shares_line = |a: NodeId, b: NodeId| {
            topo.occurrences(a)
                .iter()
                .any(|&(line, _)| topo.line(line).position_of(b).is_some())
        };

        match mv {
            Move::Step { from, to } => {
                let reachable = if piece.is_king() {
                    shares_line(from, to)
                } else {
                    topo.adjacent(from, to)
                };
                if !reachable {
                    return Err("destination is not reachable");
                }
            }
            Move::Jump { from, over, to } => {
                match board.get(over) {
                    Some(victim) if victim.side != piece.side => {}
                    _ => return Err("no opposing piece to capture"),
                }
                if over == to || !shares_line(from, over) || !shares_line(over, to) {
                    return Err("capture does not follow a line");
                }
            }
        }

        Ok(())
    }
}
