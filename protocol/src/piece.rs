//! 棋子定义

use serde::{Deserialize, Serialize};

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    /// 普通棋子
    Man,
    /// 王（飞王），到达中心后永久升变
    King,
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// A 方（红，先手，开局占据各环 0..5）
    A,
    /// B 方（蓝，后手，开局占据各环 6..11）
    B,
}

impl Side {
    /// 获取对方阵营
    pub fn opponent(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// 局面字符串中使用的字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Side::A => 'a',
            Side::B => 'b',
        }
    }

    /// 从局面字符解析（大小写均可）
    pub fn from_fen_char(c: char) -> Option<Side> {
        match c {
            'a' | 'A' => Some(Side::A),
            'b' | 'B' => Some(Side::B),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
}

impl Piece {
    /// 创建普通棋子
    pub fn man(side: Side) -> Self {
        Self {
            side,
            kind: PieceKind::Man,
        }
    }

    /// 创建王
    pub fn king(side: Side) -> Self {
        Self {
            side,
            kind: PieceKind::King,
        }
    }

    /// 是否为王
    pub fn is_king(&self) -> bool {
        self.kind == PieceKind::King
    }

    /// 升变后的棋子（已是王则不变）
    pub fn promoted(self) -> Self {
        Self::king(self.side)
    }

    /// 局面字符：普通棋子小写，王大写
    pub fn to_fen_char(&self) -> char {
        let c = self.side.to_fen_char();
        match self.kind {
            PieceKind::Man => c,
            PieceKind::King => c.to_ascii_uppercase(),
        }
    }

    /// 从局面字符解析
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let side = Side::from_fen_char(c)?;
        if c.is_ascii_uppercase() {
            Some(Piece::king(side))
        } else {
            Some(Piece::man(side))
        }
    }
}
