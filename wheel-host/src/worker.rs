//! AI 计算任务
//!
//! 搜索在阻塞线程池中运行，不阻塞事件循环。结果至少在思考窗口结束后才返回，
//! 让 AI 的走子节奏和难度匹配。

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::debug;
use wheel_ai::{AiConfig, AiEngine};

use crate::session::{AiReply, AiTicket};

/// AI 计算器
#[derive(Debug, Clone, Default)]
pub struct AiWorker {
    /// 固定种子（测试和复现用）
    seed: Option<u64>,
    /// 是否等待完整的思考窗口
    pace: bool,
}

impl AiWorker {
    /// 按难度节奏返回结果
    pub fn new() -> Self {
        Self { seed: None, pace: true }
    }

    /// 使用固定种子
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 计算完成立即返回
    pub fn without_pacing(mut self) -> Self {
        self.pace = false;
        self
    }

    /// 为一次 AI 请求计算走法
    pub async fn think(&self, ticket: AiTicket) -> Result<AiReply> {
        let config = AiConfig::from_difficulty(ticket.difficulty);
        let window = Duration::from_millis(config.think_window_ms);
        let started = tokio::time::Instant::now();

        let seed = self.seed;
        let (ticket, mv, nodes) = tokio::task::spawn_blocking(move || {
            let mut engine = AiEngine::new(config);
            if let Some(seed) = seed {
                engine = engine.with_seed(seed);
            }
            let deadline = Instant::now() + Duration::from_millis(engine.config().time_limit_ms);
            let mv = engine.select_move(&ticket.state, ticket.side, deadline);
            let nodes = engine.nodes_searched();
            (ticket, mv, nodes)
        })
        .await
        .context("AI 计算任务异常退出")?;

        debug!(
            "AI({}) 搜索 {} 个节点，用时 {:?}",
            ticket.difficulty,
            nodes,
            started.elapsed()
        );

        if self.pace {
            tokio::time::sleep_until(started + window).await;
        }

        Ok(AiReply { ticket, mv })
    }
}
