//! 节点标识
//!
//! 对外使用字符串形式 `O0..O11`、`MO0..MO11`、`MI0..MI11`、`I0..I11`、`C`，
//! 内部压缩为 0..49 的整数索引：`环序号 * 12 + 辐条序号`，中心为 48。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{CENTER_INDEX, NODE_COUNT, RING_COUNT, RING_SIZE};
use crate::error::RuleError;

/// 同心环（由外向内）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ring {
    /// 外环 O
    Outer,
    /// 中外环 MO
    MiddleOuter,
    /// 中内环 MI
    MiddleInner,
    /// 内环 I
    Inner,
}

impl Ring {
    /// 由外向内的全部环
    pub const ALL: [Ring; RING_COUNT] = [
        Ring::Outer,
        Ring::MiddleOuter,
        Ring::MiddleInner,
        Ring::Inner,
    ];

    /// 节点名前缀
    pub fn prefix(&self) -> &'static str {
        match self {
            Ring::Outer => "O",
            Ring::MiddleOuter => "MO",
            Ring::MiddleInner => "MI",
            Ring::Inner => "I",
        }
    }

    /// 环序号（外环为 0）
    pub fn ordinal(&self) -> usize {
        match self {
            Ring::Outer => 0,
            Ring::MiddleOuter => 1,
            Ring::MiddleInner => 2,
            Ring::Inner => 3,
        }
    }

    fn from_prefix(prefix: &str) -> Option<Ring> {
        match prefix {
            "O" => Some(Ring::Outer),
            "MO" => Some(Ring::MiddleOuter),
            "MI" => Some(Ring::MiddleInner),
            "I" => Some(Ring::Inner),
            _ => None,
        }
    }
}

/// 棋盘节点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(u8);

impl NodeId {
    /// 中心节点 C
    pub const CENTER: NodeId = NodeId(CENTER_INDEX as u8);

    /// 环上节点，`index` 按 12 取模
    pub const fn ring(ring: Ring, index: usize) -> Self {
        let ordinal = match ring {
            Ring::Outer => 0,
            Ring::MiddleOuter => 1,
            Ring::MiddleInner => 2,
            Ring::Inner => 3,
        };
        NodeId((ordinal * RING_SIZE + index % RING_SIZE) as u8)
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < NODE_COUNT {
            Some(NodeId(index as u8))
        } else {
            None
        }
    }

    /// 转换为数组索引
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// 全部 49 个节点：O, MO, MI, I 各环依次，最后是 C
    pub fn all() -> impl Iterator<Item = NodeId> {
        (0..NODE_COUNT).map(|i| NodeId(i as u8))
    }

    /// 是否为中心
    pub fn is_center(&self) -> bool {
        self.index() == CENTER_INDEX
    }

    /// 所在的环，中心返回 None
    pub fn ring_of(&self) -> Option<Ring> {
        if self.is_center() {
            None
        } else {
            Some(Ring::ALL[self.index() / RING_SIZE])
        }
    }

    /// 在环上的序号（即辐条序号），中心返回 None
    pub fn spoke_index(&self) -> Option<usize> {
        if self.is_center() {
            None
        } else {
            Some(self.index() % RING_SIZE)
        }
    }

    /// 同一环上相邻的节点，`dir` 为 +1 / -1，跨越 11 ↔ 0
    pub fn lateral(&self, dir: i8) -> Option<NodeId> {
        let ring = self.ring_of()?;
        let index = self.spoke_index()? as i64;
        let next = (index + dir as i64).rem_euclid(RING_SIZE as i64) as usize;
        Some(NodeId::ring(ring, next))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.ring_of(), self.spoke_index()) {
            (Some(ring), Some(index)) => write!(f, "{}{}", ring.prefix(), index),
            _ => write!(f, "C"),
        }
    }
}

impl FromStr for NodeId {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RuleError::InvalidNode { name: s.to_string() };

        if s == "C" {
            return Ok(NodeId::CENTER);
        }

        let split = s.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
        let (prefix, digits) = s.split_at(split);
        let ring = Ring::from_prefix(prefix).ok_or_else(invalid)?;

        // 不接受前导零和符号，保证字符串与节点一一对应
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(invalid());
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let index: usize = digits.parse().map_err(|_| invalid())?;
        if index >= RING_SIZE {
            return Err(invalid());
        }

        Ok(NodeId::ring(ring, index))
    }
}

impl TryFrom<String> for NodeId {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeId> for String {
    fn from(node: NodeId) -> Self {
        node.to_string()
    }
}
