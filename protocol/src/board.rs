//! 棋盘状态

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{NODE_COUNT, RING_SIZE, SIDE_A_INDICES, SIDE_B_INDICES};
use crate::moves::Move;
use crate::node::{NodeId, Ring};
use crate::piece::{Piece, Side};

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// 49 个节点，索引见 `NodeId::index`，使用 Vec 以支持 serde
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; NODE_COUNT],
        }
    }

    /// 创建初始棋盘：每个环 0..5 属于 A，6..11 属于 B，中心为空
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for ring in Ring::ALL {
            for i in SIDE_A_INDICES {
                board.set(NodeId::ring(ring, i), Some(Piece::man(Side::A)));
            }
            for i in SIDE_B_INDICES {
                board.set(NodeId::ring(ring, i), Some(Piece::man(Side::B)));
            }
        }
        board
    }

    /// 获取指定节点的棋子
    pub fn get(&self, node: NodeId) -> Option<Piece> {
        self.squares[node.index()]
    }

    /// 设置指定节点的棋子
    pub fn set(&mut self, node: NodeId, piece: Option<Piece>) {
        self.squares[node.index()] = piece;
    }

    /// 取走指定节点的棋子
    pub fn take(&mut self, node: NodeId) -> Option<Piece> {
        self.squares[node.index()].take()
    }

    /// 节点是否为空
    pub fn is_empty(&self, node: NodeId) -> bool {
        self.get(node).is_none()
    }

    /// 获取指定阵营的所有棋子位置（按节点顺序）
    pub fn pieces(&self, side: Side) -> Vec<(NodeId, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.side == side)
            .collect()
    }

    /// 获取所有棋子
    pub fn all_pieces(&self) -> Vec<(NodeId, Piece)> {
        NodeId::all()
            .filter_map(|node| self.get(node).map(|piece| (node, piece)))
            .collect()
    }

    /// 指定阵营的棋子数
    pub fn count(&self, side: Side) -> usize {
        self.squares
            .iter()
            .flatten()
            .filter(|piece| piece.side == side)
            .count()
    }

    /// 棋子总数
    pub fn total(&self) -> usize {
        self.squares.iter().flatten().count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for Board {
    /// 每个环一行，最后一行是中心
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = |node: NodeId| self.get(node).map(|p| p.to_fen_char()).unwrap_or('.');
        for ring in Ring::ALL {
            write!(f, "{:>2} ", ring.prefix())?;
            for i in 0..RING_SIZE {
                write!(f, "{}", cell(NodeId::ring(ring, i)))?;
            }
            writeln!(f)?;
        }
        write!(f, " C {}", cell(NodeId::CENTER))
    }
}

/// 完整的游戏状态
///
/// 只通过 `Rules::apply_move` / `Rules::apply_timeout` 产生新值，从不原地修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// 棋盘
    pub board: Board,
    /// 当前走子方
    pub turn: Side,
    /// 已走的走法
    pub history: Vec<Move>,
    /// 连续吃子尚未结束时，必须继续吃子的节点
    pub must_continue_from: Option<NodeId>,
}

impl GameState {
    /// 创建初始状态，A 方先走
    pub fn initial() -> Self {
        Self::from_board(Board::initial(), Side::A)
    }

    /// 从棋盘创建状态
    pub fn from_board(board: Board, turn: Side) -> Self {
        Self {
            board,
            turn,
            history: Vec::new(),
            must_continue_from: None,
        }
    }

    /// 供渲染使用的快照（不含历史）
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            turn: self.turn,
            must_continue_from: self.must_continue_from,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

/// 局面快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Board,
    pub turn: Side,
    pub must_continue_from: Option<NodeId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PIECES_PER_SIDE;

    fn node(name: &str) -> NodeId {
        name.parse().unwrap()
    }

    #[test]
    fn test_initial_board() {
        let board = Board::initial();
        assert_eq!(board.count(Side::A), PIECES_PER_SIDE);
        assert_eq!(board.count(Side::B), PIECES_PER_SIDE);
        assert!(board.is_empty(NodeId::CENTER));

        assert_eq!(board.get(node("O0")), Some(Piece::man(Side::A)));
        assert_eq!(board.get(node("MI5")), Some(Piece::man(Side::A)));
        assert_eq!(board.get(node("I6")), Some(Piece::man(Side::B)));
        assert_eq!(board.get(node("MO11")), Some(Piece::man(Side::B)));
    }

    #[test]
    fn test_take_and_set() {
        let mut board = Board::initial();
        let piece = board.take(node("I2"));
        assert_eq!(piece, Some(Piece::man(Side::A)));
        assert!(board.is_empty(node("I2")));

        board.set(NodeId::CENTER, piece);
        assert_eq!(board.get(NodeId::CENTER), Some(Piece::man(Side::A)));
        assert_eq!(board.total(), 2 * PIECES_PER_SIDE);
    }

    #[test]
    fn test_pieces_by_side() {
        let mut board = Board::empty();
        board.set(node("O3"), Some(Piece::man(Side::A)));
        board.set(node("C"), Some(Piece::king(Side::B)));
        board.set(node("MI1"), Some(Piece::man(Side::A)));

        let a = board.pieces(Side::A);
        assert_eq!(a, vec![(node("O3"), Piece::man(Side::A)), (node("MI1"), Piece::man(Side::A))]);
        assert_eq!(board.pieces(Side::B), vec![(NodeId::CENTER, Piece::king(Side::B))]);
    }

    #[test]
    fn test_display() {
        let text = Board::initial().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], " O aaaaaabbbbbb");
        assert_eq!(lines[4], " C .");
    }

    #[test]
    fn test_snapshot_drops_history() {
        let state = GameState::initial();
        let snap = state.snapshot();
        assert_eq!(snap.board, state.board);
        assert_eq!(snap.turn, Side::A);
        assert_eq!(snap.must_continue_from, None);
    }
}
