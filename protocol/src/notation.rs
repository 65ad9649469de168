//! 走法文本表示
//!
//! 格式：
//! - 普通移动 `<起点>-<终点>`，如 `O3-O4`
//! - 吃子 `<起点>x<被吃>-<终点>`，如 `O0xO1-O2`
//! - 简写 `<起点> <终点>`，需要结合当前局面的合法走法解析

use crate::board::GameState;
use crate::error::RuleError;
use crate::moves::Move;
use crate::node::NodeId;
use crate::rules::Rules;

/// 走法表示法
pub struct Notation;

impl Notation {
    /// 走法的文本形式
    pub fn to_text(mv: &Move) -> String {
        mv.to_string()
    }

    /// 解析完整形式（不依赖局面）
    pub fn parse(text: &str) -> Result<Move, RuleError> {
        let text = text.trim();
        let err = || RuleError::InvalidNotation {
            text: text.to_string(),
        };

        let (head, to) = text.split_once('-').ok_or_else(err)?;
        let to = parse_node(to).ok_or_else(err)?;

        match head.split_once('x') {
            Some((from, over)) => Ok(Move::Jump {
                from: parse_node(from).ok_or_else(err)?,
                over: parse_node(over).ok_or_else(err)?,
                to,
            }),
            None => Ok(Move::Step {
                from: parse_node(head).ok_or_else(err)?,
                to,
            }),
        }
    }

    /// 结合局面解析
    ///
    /// 完整形式必须与某个合法走法完全一致；简写 `起点 终点` 或
    /// 不带被吃节点的 `起点-终点` 匹配起点和终点相同的第一个合法走法。
    pub fn resolve(state: &GameState, text: &str) -> Result<Move, RuleError> {
        let trimmed = text.trim();
        let legal = Rules::legal_moves(state);

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        let endpoints = match tokens.as_slice() {
            &[from, to] => Some((from, to)),
            &[single] => match Self::parse(single)? {
                mv @ Move::Jump { .. } => {
                    return if legal.contains(&mv) {
                        Ok(mv)
                    } else {
                        Err(RuleError::IllegalMove {
                            notation: mv.to_string(),
                        })
                    };
                }
                Move::Step { .. } => single.split_once('-'),
            },
            _ => None,
        };

        let (from, to) = endpoints.ok_or_else(|| RuleError::InvalidNotation {
            text: trimmed.to_string(),
        })?;
        let from: NodeId = from.parse()?;
        let to: NodeId = to.parse()?;

        if state.board.is_empty(from) {
            return Err(RuleError::NoPiece {
                node: from.to_string(),
            });
        }

        legal
            .into_iter()
            .find(|mv| mv.from() == from && mv.to() == to)
            .ok_or_else(|| RuleError::IllegalMove {
                notation: format!("{}-{}", from, to),
            })
    }
}

fn parse_node(text: &str) -> Option<NodeId> {
    text.parse().ok()
}
