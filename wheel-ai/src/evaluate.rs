//! 局面评估函数
//!
//! 分值以十分之一子为单位：普通棋子 10，王 30，每个可用的吃子走法 5，占据中心 3。

use wheel_protocol::{Board, GameState, NodeId, Piece, Rules, Side};

/// 普通棋子价值
pub const MAN_VALUE: i32 = 10;
/// 王的价值
pub const KING_VALUE: i32 = 30;
/// 每个可用吃子走法的加分
pub const CAPTURE_BONUS: i32 = 5;
/// 占据中心的加分
pub const CENTER_BONUS: i32 = 3;

/// 评估器
pub struct Evaluator;

impl Evaluator {
    /// 评估局面（`side` 视角，正值对 `side` 有利）
    pub fn evaluate(state: &GameState, side: Side) -> i32 {
        Self::material(&state.board, side)
            + Self::capture_bonus(state, side)
            + Self::center_bonus(&state.board, side)
    }

    /// 子力：己方为正，对方为负
    pub fn material(board: &Board, side: Side) -> i32 {
        board
            .all_pieces()
            .into_iter()
            .map(|(_, piece)| {
                let value = Self::piece_value(piece);
                if piece.side == side {
                    value
                } else {
                    -value
                }
            })
            .sum()
    }

    /// 单个棋子的价值
    pub fn piece_value(piece: Piece) -> i32 {
        if piece.is_king() {
            KING_VALUE
        } else {
            MAN_VALUE
        }
    }

    /// 当前合法走法中属于 `side` 的吃子数；对方走子时为 0
    fn capture_bonus(state: &GameState, side: Side) -> i32 {
        if state.turn != side {
            return 0;
        }
        let captures = Rules::legal_moves(state)
            .iter()
            .filter(|mv| mv.is_jump())
            .count() as i32;
        captures * CAPTURE_BONUS
    }

    fn center_bonus(board: &Board, side: Side) -> i32 {
        match board.get(NodeId::CENTER) {
            Some(piece) if piece.side == side => CENTER_BONUS,
            _ => 0,
        }
    }
}
