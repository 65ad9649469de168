//! 走法生成

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::node::NodeId;
use crate::piece::{Piece, Side};
use crate::topology::Topology;

/// 走法
///
/// 序列化为 `{"kind": "step" | "jump", "from", "to", "over"?}`，节点使用字符串名。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Move {
    /// 普通移动
    Step { from: NodeId, to: NodeId },
    /// 吃子：越过 `over` 上的敌子落在 `to`
    Jump { from: NodeId, over: NodeId, to: NodeId },
}

impl Move {
    /// 起点
    pub fn from(&self) -> NodeId {
        match *self {
            Move::Step { from, .. } | Move::Jump { from, .. } => from,
        }
    }

    /// 终点
    pub fn to(&self) -> NodeId {
        match *self {
            Move::Step { to, .. } | Move::Jump { to, .. } => to,
        }
    }

    /// 被吃的节点
    pub fn over(&self) -> Option<NodeId> {
        match *self {
            Move::Step { .. } => None,
            Move::Jump { over, .. } => Some(over),
        }
    }

    /// 是否吃子
    pub fn is_jump(&self) -> bool {
        matches!(self, Move::Jump { .. })
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Step { from, to } => write!(f, "{}-{}", from, to),
            Move::Jump { from, over, to } => write!(f, "{}x{}-{}", from, over, to),
        }
    }
}

/// 走法生成器
///
/// 生成结果去重并保持首次生成的顺序：棋子按节点顺序，方向按线的顺序。
pub struct MoveGenerator;

impl MoveGenerator {
    /// 指定阵营的所有普通移动（不考虑强制吃子）
    pub fn legal_steps(board: &Board, side: Side) -> Vec<Move> {
        let mut moves = Vec::with_capacity(32);
        for (node, piece) in board.pieces(side) {
            if piece.is_king() {
                Self::generate_king_slides(board, node, &mut moves);
            } else {
                Self::generate_man_steps(board, node, &mut moves);
            }
        }
        moves
    }

    /// 指定阵营所有棋子的吃子走法
    pub fn legal_jumps_all(board: &Board, side: Side) -> Vec<Move> {
        let mut moves = Vec::new();
        for (node, piece) in board.pieces(side) {
            Self::generate_piece_jumps(board, node, piece, &mut moves);
        }
        moves
    }

    /// 指定节点上棋子的吃子走法；节点上不是 `side` 的棋子时为空
    pub fn legal_jumps_from(board: &Board, side: Side, node: NodeId) -> Vec<Move> {
        let mut moves = Vec::new();
        if let Some(piece) = board.get(node) {
            if piece.side == side {
                Self::generate_piece_jumps(board, node, piece, &mut moves);
            }
        }
        moves
    }

    fn generate_piece_jumps(board: &Board, node: NodeId, piece: Piece, moves: &mut Vec<Move>) {
        if piece.is_king() {
            Self::generate_king_jumps(board, node, piece.side, moves);
        } else {
            Self::generate_man_jumps(board, node, piece.side, moves);
            Self::generate_lateral_jumps(board, node, piece.side, moves);
        }
    }

    /// 普通棋子：移动到相邻空位
    fn generate_man_steps(board: &Board, from: NodeId, moves: &mut Vec<Move>) {
        for &to in Topology::get().adjacency(from) {
            if board.is_empty(to) {
                push_unique(moves, Move::Step { from, to });
            }
        }
    }

    /// 普通棋子：沿直线越过相邻敌子
    ///
    /// 在 `from` 与 `over` 共同所在的线上取方向 d = pos(over) - pos(from)（必须为 ±1），
    /// 落点为 pos(over) + d，存在且为空时可吃。
    fn generate_man_jumps(board: &Board, from: NodeId, side: Side, moves: &mut Vec<Move>) {
        let topo = Topology::get();
        for &over in topo.adjacency(from) {
            if !is_opponent(board, over, side) {
                continue;
            }
            for &(line_idx, from_pos) in topo.occurrences(from) {
                let line = topo.line(line_idx);
                let Some(over_pos) = line.position_of(over) else {
                    continue;
                };
                let Some(dir) = line.direction_between(from_pos, over_pos) else {
                    continue;
                };
                if let Some(land_pos) = line.step(over_pos, dir, 1) {
                    let to = line.node_at(land_pos);
                    if board.is_empty(to) {
                        push_unique(moves, Move::Jump { from, over, to });
                    }
                }
            }
        }
    }

    /// 普通棋子：同环横向吃子（环上索引 ±1，跨越 11 ↔ 0）
    fn generate_lateral_jumps(board: &Board, from: NodeId, side: Side, moves: &mut Vec<Move>) {
        for dir in [1i8, -1i8] {
            let Some(over) = from.lateral(dir) else {
                return;
            };
            if !is_opponent(board, over, side) {
                continue;
            }
            if let Some(to) = over.lateral(dir) {
                if board.is_empty(to) {
                    push_unique(moves, Move::Jump { from, over, to });
                }
            }
        }
    }

    /// 王：沿每条线向两侧滑行，直到遇到棋子或线的尽头
    fn generate_king_slides(board: &Board, from: NodeId, moves: &mut Vec<Move>) {
        let topo = Topology::get();
        for &(line_idx, pos) in topo.occurrences(from) {
            let line = topo.line(line_idx);
            for dir in [1i8, -1i8] {
                for distance in 1..line.len() {
                    let Some(p) = line.step(pos, dir, distance) else {
                        break;
                    };
                    let to = line.node_at(p);
                    if !board.is_empty(to) {
                        break;
                    }
                    push_unique(moves, Move::Step { from, to });
                }
            }
        }
    }

    /// 王：沿每条线跳过空位，遇到第一个敌子时检查其后一格
    ///
    /// 每个方向最多一次吃子；遇到己方棋子则该方向无吃子。
    fn generate_king_jumps(board: &Board, from: NodeId, side: Side, moves: &mut Vec<Move>) {
        let topo = Topology::get();
        for &(line_idx, pos) in topo.occurrences(from) {
            let line = topo.line(line_idx);
            for dir in [1i8, -1i8] {
                for distance in 1..line.len() {
                    let Some(p) = line.step(pos, dir, distance) else {
                        break;
                    };
                    let over = line.node_at(p);
                    match board.get(over) {
                        None => continue,
                        Some(piece) if piece.side == side => break,
                        Some(_) => {
                            if let Some(land_pos) = line.step(p, dir, 1) {
                                let to = line.node_at(land_pos);
                                if board.is_empty(to) {
                                    push_unique(moves, Move::Jump { from, over, to });
                                }
                            }
                            break;
                        }
                    }
                }
            }
        }
    }
}

fn is_opponent(board: &Board, node: NodeId, side: Side) -> bool {
    matches!(board.get(node), Some(piece) if piece.side != side)
}

fn push_unique(moves: &mut Vec<Move>, mv: Move) {
    if !moves.contains(&mv) {
        moves.push(mv);
    }
}
