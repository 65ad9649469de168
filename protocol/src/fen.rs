//! 局面文本格式（类 FEN）
//!
//! `<棋盘> <走子方> [<连续吃子节点>]`
//!
//! 棋盘按 `NodeId::all()` 顺序书写，每个环一组、中心一组，用 `/` 分隔；
//! `a`/`b` 为普通棋子，`A`/`B` 为王，数字表示连续空节点数。
//!
//! 示例：
//! `aaaaaabbbbbb/aaaaaabbbbbb/aaaaaabbbbbb/aaaaaabbbbbb/1 a`

use crate::board::{Board, GameState};
use crate::constants::RING_SIZE;
use crate::error::RuleError;
use crate::moves::MoveGenerator;
use crate::node::{NodeId, Ring};
use crate::piece::{Piece, Side};

/// 初始局面
pub const INITIAL_FEN: &str = "aaaaaabbbbbb/aaaaaabbbbbb/aaaaaabbbbbb/aaaaaabbbbbb/1 a";

/// 局面文本格式处理
pub struct Fen;

impl Fen {
    /// 解析为游戏状态（历史为空）
    pub fn parse(fen: &str) -> Result<GameState, RuleError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.is_empty() {
            return Err(invalid("empty FEN string"));
        }
        if parts.len() > 3 {
            return Err(invalid(format!("expected at most 3 fields, got {}", parts.len())));
        }

        let board = Self::parse_board(parts[0])?;

        // 走子方默认 A
        let turn = match parts.get(1) {
            Some(field) => {
                let mut chars = field.chars();
                match (chars.next().and_then(Side::from_fen_char), chars.next()) {
                    (Some(side), None) => side,
                    _ => return Err(invalid(format!("invalid side to move: {}", field))),
                }
            }
            None => Side::A,
        };

        let mut state = GameState::from_board(board, turn);

        if let Some(field) = parts.get(2) {
            let node: NodeId = field
                .parse()
                .map_err(|_| invalid(format!("invalid continuation node: {}", field)))?;
            match state.board.get(node) {
                Some(piece) if piece.side == turn => {}
                _ => {
                    return Err(invalid(format!(
                        "continuation node {} holds no piece of the side to move",
                        node
                    )))
                }
            }
            // 只有还能继续吃子时才处于连续吃子中
            if MoveGenerator::legal_jumps_from(&state.board, turn, node).is_empty() {
                return Err(invalid(format!("continuation node {} has no jump", node)));
            }
            state.must_continue_from = Some(node);
        }

        Ok(state)
    }

    /// 解析棋盘部分
    fn parse_board(board_str: &str) -> Result<Board, RuleError> {
        let groups: Vec<&str> = board_str.split('/').collect();
        if groups.len() != Ring::ALL.len() + 1 {
            return Err(invalid(format!(
                "expected {} groups, got {}",
                Ring::ALL.len() + 1,
                groups.len()
            )));
        }

        let mut board = Board::empty();

        for (group_idx, group) in groups.iter().enumerate() {
            let nodes: Vec<NodeId> = match Ring::ALL.get(group_idx) {
                Some(&ring) => (0..RING_SIZE).map(|i| NodeId::ring(ring, i)).collect(),
                None => vec![NodeId::CENTER],
            };

            let mut cursor = 0usize;
            let mut empty_run = 0usize;

            for c in group.chars() {
                if let Some(digit) = c.to_digit(10) {
                    if empty_run == 0 && digit == 0 {
                        return Err(invalid(format!("group {} has a zero-length run", group_idx)));
                    }
                    empty_run = empty_run * 10 + digit as usize;
                    if cursor + empty_run > nodes.len() {
                        return Err(invalid(format!("group {} has too many nodes", group_idx)));
                    }
                    continue;
                }

                cursor += empty_run;
                empty_run = 0;

                let piece = Piece::from_fen_char(c)
                    .ok_or_else(|| invalid(format!("invalid piece character: {}", c)))?;
                let node = *nodes
                    .get(cursor)
                    .ok_or_else(|| invalid(format!("group {} has too many nodes", group_idx)))?;
                board.set(node, Some(piece));
                cursor += 1;
            }
            cursor += empty_run;

            if cursor != nodes.len() {
                return Err(invalid(format!(
                    "group {} has {} nodes, expected {}",
                    group_idx,
                    cursor,
                    nodes.len()
                )));
            }
        }

        Ok(board)
    }

    /// 将游戏状态转换为文本
    pub fn to_fen(state: &GameState) -> String {
        let mut fen = format!(
            "{} {}",
            Self::board_to_string(&state.board),
            state.turn.to_fen_char()
        );
        if let Some(node) = state.must_continue_from {
            fen.push(' ');
            fen.push_str(&node.to_string());
        }
        fen
    }

    /// 将棋盘转换为文本的棋盘部分
    pub fn board_to_string(board: &Board) -> String {
        let mut groups: Vec<Vec<NodeId>> = Ring::ALL
            .iter()
            .map(|&ring| (0..RING_SIZE).map(|i| NodeId::ring(ring, i)).collect())
            .collect();
        groups.push(vec![NodeId::CENTER]);

        groups
            .iter()
            .map(|nodes| {
                let mut group = String::new();
                let mut empty_count = 0;
                for &node in nodes {
                    match board.get(node) {
                        Some(piece) => {
                            if empty_count > 0 {
                                group.push_str(&empty_count.to_string());
                                empty_count = 0;
                            }
                            group.push(piece.to_fen_char());
                        }
                        None => empty_count += 1,
                    }
                }
                if empty_count > 0 {
                    group.push_str(&empty_count.to_string());
                }
                group
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn invalid(reason: impl Into<String>) -> RuleError {
    RuleError::InvalidFen {
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str) -> NodeId {
        name.parse().unwrap()
    }

    #[test]
    fn test_parse_initial_fen() {
        let state = Fen::parse(INITIAL_FEN).unwrap();
        assert_eq!(state, GameState::initial());
        assert_eq!(Fen::to_fen(&GameState::initial()), INITIAL_FEN);
    }

    #[test]
    fn test_parse_sparse_position() {
        let state = Fen::parse("a1b9/12/3B8/12/A b").unwrap();
        assert_eq!(state.turn, Side::B);
        assert_eq!(state.board.get(node("O0")), Some(Piece::man(Side::A)));
        assert_eq!(state.board.get(node("O2")), Some(Piece::man(Side::B)));
        assert_eq!(state.board.get(node("MI3")), Some(Piece::king(Side::B)));
        assert_eq!(state.board.get(NodeId::CENTER), Some(Piece::king(Side::A)));
        assert_eq!(state.board.total(), 4);
        assert_eq!(Fen::to_fen(&state), "a1b9/12/3B8/12/A b");
    }

    #[test]
    fn test_continuation_field() {
        let state = Fen::parse("2ab8/12/12/12/1 a O2").unwrap();
        assert_eq!(state.must_continue_from, Some(node("O2")));
        assert_eq!(Fen::to_fen(&state), "2ab8/12/12/12/1 a O2");

        // 连续吃子节点必须是走子方的棋子
        assert!(Fen::parse("2ab8/12/12/12/1 b O2").is_err());
        assert!(Fen::parse("2ab8/12/12/12/1 a O4").is_err());
    }

    #[test]
    fn test_continuation_requires_jump() {
        // I0 上的棋子无子可吃，O0 才有 O0xO1-O2
        assert!(matches!(
            Fen::parse("ab10/12/12/a11/1 a I0"),
            Err(RuleError::InvalidFen { .. })
        ));
        assert!(matches!(
            Fen::parse("2a9/12/12/12/1 a O2"),
            Err(RuleError::InvalidFen { .. })
        ));
        let state = Fen::parse("ab10/12/12/a11/1 a O0").unwrap();
        assert_eq!(state.must_continue_from, Some(node("O0")));
    }

    #[test]
    fn test_overlong_empty_run() {
        assert!(matches!(
            Fen::parse("99999999999999999999999/12/12/12/1 a"),
            Err(RuleError::InvalidFen { .. })
        ));
        assert!(Fen::parse("12/12/12/12/100000000000000000000000 a").is_err());
        assert!(Fen::parse("13/12/12/12/1 a").is_err());
    }

    #[test]
    fn test_turn_defaults_to_a() {
        let state = Fen::parse("12/12/12/12/a").unwrap();
        assert_eq!(state.turn, Side::A);
    }

    #[test]
    fn test_invalid_fen() {
        assert!(Fen::parse("").is_err());
        // 组数不对
        assert!(Fen::parse("12/12/12/1 a").is_err());
        // 节点数不对
        assert!(Fen::parse("11/12/12/12/1 a").is_err());
        assert!(Fen::parse("a12/12/12/12/1 a").is_err());
        assert!(Fen::parse("12/12/12/12/2 a").is_err());
        // 无效字符
        assert!(Fen::parse("x11/12/12/12/1 a").is_err());
        // 无效走子方
        assert!(Fen::parse("12/12/12/12/1 c").is_err());
        assert!(Fen::parse("12/12/12/12/1 ab").is_err());
        // 零长度空位
        assert!(Fen::parse("0a11/12/12/12/1 a").is_err());
    }
}
