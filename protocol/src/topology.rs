//! 棋盘拓扑
//!
//! 49 个节点由 4 个闭合环和 12 条辐条连接。每条辐条是经过中心的 9 节点路径
//! `Oi, MOi, MIi, Ii, C, I(i+6), MI(i+6), MO(i+6), O(i+6)`，因此 i 与 i+6
//! 两条辐条是同一条路径的正反两个方向。邻接关系为所有线上相邻节点的并集。
//!
//! 拓扑在进程内只构建一次，之后只读共享。

use lazy_static::lazy_static;

use crate::constants::{NODE_COUNT, RING_SIZE, SPOKE_LEN};
use crate::node::{NodeId, Ring};

lazy_static! {
    static ref TOPOLOGY: Topology = Topology::build();
}

/// 一条直线（环或辐条）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    nodes: Vec<NodeId>,
    /// 环是闭合的，首尾相邻
    closed: bool,
}

impl Line {
    fn new(nodes: Vec<NodeId>, closed: bool) -> Self {
        Self { nodes, closed }
    }

    /// 线上的节点（按顺序）
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// 是否闭合
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 指定位置的节点
    pub fn node_at(&self, pos: usize) -> NodeId {
        self.nodes[pos]
    }

    /// 节点在线上的位置
    pub fn position_of(&self, node: NodeId) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node)
    }

    /// 从 `pos` 沿 `dir`（±1）走 `distance` 步后的位置
    ///
    /// 闭合线按长度取模；开放线越界返回 None。
    pub fn step(&self, pos: usize, dir: i8, distance: usize) -> Option<usize> {
        let len = self.nodes.len() as i64;
        let target = pos as i64 + dir as i64 * distance as i64;
        if self.closed {
            Some(target.rem_euclid(len) as usize)
        } else if (0..len).contains(&target) {
            Some(target as usize)
        } else {
            None
        }
    }

    /// 两个位置之间的有向距离，仅在相邻时返回 ±1
    pub fn direction_between(&self, from: usize, to: usize) -> Option<i8> {
        [1i8, -1i8]
            .into_iter()
            .find(|&dir| self.step(from, dir, 1) == Some(to))
    }

    /// 一条线上相邻的节点对（闭合线包含首尾）
    fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        let closing = if self.closed && self.nodes.len() > 2 {
            Some((self.nodes[self.nodes.len() - 1], self.nodes[0]))
        } else {
            None
        };
        self.nodes
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
    }
}

/// 棋盘拓扑
#[derive(Debug)]
pub struct Topology {
    lines: Vec<Line>,
    /// 每个节点的邻居（升序、无重复）
    adjacency: Vec<Vec<NodeId>>,
    /// 每个节点出现在哪些线的哪个位置：(线序号, 位置)
    occurrences: Vec<Vec<(usize, usize)>>,
}

impl Topology {
    /// 共享的拓扑实例
    pub fn get() -> &'static Topology {
        &TOPOLOGY
    }

    fn build() -> Self {
        let mut lines = Vec::with_capacity(Ring::ALL.len() + RING_SIZE);

        // 4 个闭合环
        for ring in Ring::ALL {
            let nodes = (0..RING_SIZE).map(|i| NodeId::ring(ring, i)).collect();
            lines.push(Line::new(nodes, true));
        }

        // 12 条辐条
        for i in 0..RING_SIZE {
            let opp = (i + RING_SIZE / 2) % RING_SIZE;
            let mut nodes = Vec::with_capacity(SPOKE_LEN);
            nodes.extend(Ring::ALL.iter().map(|&ring| NodeId::ring(ring, i)));
            nodes.push(NodeId::CENTER);
            nodes.extend(Ring::ALL.iter().rev().map(|&ring| NodeId::ring(ring, opp)));
            lines.push(Line::new(nodes, false));
        }

        let mut adjacency = vec![Vec::new(); NODE_COUNT];
        let mut occurrences = vec![Vec::new(); NODE_COUNT];

        for (line_idx, line) in lines.iter().enumerate() {
            for (pos, node) in line.nodes().iter().enumerate() {
                occurrences[node.index()].push((line_idx, pos));
            }
            for (a, b) in line.edges() {
                adjacency[a.index()].push(b);
                adjacency[b.index()].push(a);
            }
        }

        for neighbours in &mut adjacency {
            neighbours.sort();
            neighbours.dedup();
        }

        Self {
            lines,
            adjacency,
            occurrences,
        }
    }

    /// 全部直线：先 4 个环，再 12 条辐条
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// 指定序号的线
    pub fn line(&self, index: usize) -> &Line {
        &self.lines[index]
    }

    /// 节点的邻居
    pub fn adjacency(&self, node: NodeId) -> &[NodeId] {
        &self.adjacency[node.index()]
    }

    /// 两个节点是否相邻
    pub fn adjacent(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency[a.index()].binary_search(&b).is_ok()
    }

    /// 节点在各条线上的出现位置
    pub fn occurrences(&self, node: NodeId) -> &[(usize, usize)] {
        &self.occurrences[node.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str) -> NodeId {
        name.parse().unwrap()
    }

    #[test]
    fn test_line_counts() {
        let topo = Topology::get();
        assert_eq!(topo.lines().len(), 16);
        assert_eq!(topo.lines().iter().filter(|l| l.is_closed()).count(), 4);
        for line in topo.lines().iter().filter(|l| !l.is_closed()) {
            assert_eq!(line.len(), SPOKE_LEN);
            assert_eq!(line.node_at(4), NodeId::CENTER);
        }
    }

    #[test]
    fn test_spoke_path() {
        let topo = Topology::get();
        let spoke: Vec<String> = topo.line(4 + 2).nodes().iter().map(|n| n.to_string()).collect();
        assert_eq!(
            spoke,
            vec!["O2", "MO2", "MI2", "I2", "C", "I8", "MI8", "MO8", "O8"]
        );
    }

    #[test]
    fn test_adjacency_symmetric() {
        let topo = Topology::get();
        for a in NodeId::all() {
            assert!(!topo.adjacency(a).contains(&a), "{} adjacent to itself", a);
            for &b in topo.adjacency(a) {
                assert!(topo.adjacent(b, a), "{} -> {} not symmetric", a, b);
            }
        }
    }

    #[test]
    fn test_degrees() {
        let topo = Topology::get();
        assert_eq!(topo.adjacency(NodeId::CENTER).len(), 12);
        for i in 0..RING_SIZE {
            assert_eq!(topo.adjacency(NodeId::ring(Ring::Outer, i)).len(), 3);
            assert_eq!(topo.adjacency(NodeId::ring(Ring::MiddleOuter, i)).len(), 4);
            assert_eq!(topo.adjacency(NodeId::ring(Ring::MiddleInner, i)).len(), 4);
            assert_eq!(topo.adjacency(NodeId::ring(Ring::Inner, i)).len(), 4);
        }
    }

    #[test]
    fn test_specific_neighbours() {
        let topo = Topology::get();
        assert_eq!(topo.adjacency(node("O0")), &[node("O1"), node("O11"), node("MO0")]);
        assert!(topo.adjacent(node("I3"), node("C")));
        assert!(topo.adjacent(node("O11"), node("O0")));
        assert!(!topo.adjacent(node("O0"), node("MI0")));
        assert!(!topo.adjacent(node("MO0"), node("MO2")));
    }

    #[test]
    fn test_occurrences() {
        let topo = Topology::get();
        // 环节点：1 个环 + 2 条辐条
        assert_eq!(topo.occurrences(node("MI7")).len(), 3);
        // 中心：12 条辐条
        assert_eq!(topo.occurrences(NodeId::CENTER).len(), 12);
        for &(line, pos) in topo.occurrences(node("O5")) {
            assert_eq!(topo.line(line).node_at(pos), node("O5"));
        }
    }

    #[test]
    fn test_line_step() {
        let topo = Topology::get();
        let outer = topo.line(0);
        assert_eq!(outer.step(11, 1, 1), Some(0));
        assert_eq!(outer.step(0, -1, 2), Some(10));
        assert_eq!(outer.direction_between(0, 11), Some(-1));
        assert_eq!(outer.direction_between(0, 2), None);

        let spoke = topo.line(4);
        assert_eq!(spoke.step(8, 1, 1), None);
        assert_eq!(spoke.step(0, -1, 1), None);
        assert_eq!(spoke.step(3, 1, 2), Some(5));
    }
}
