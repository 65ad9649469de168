//! 回合计时器
//!
//! 每次换手都重置为设置中的回合时长；AI 思考期间暂停。

use std::time::{Duration, Instant};

/// 回合计时器
#[derive(Debug)]
pub struct TurnTimer {
    /// 每回合时长
    duration: Duration,
    /// 本回合在 `turn_start` 之前剩余的时间
    remaining: Duration,
    /// 当前计时段开始时间
    turn_start: Option<Instant>,
    /// 是否暂停
    paused: bool,
}

impl TurnTimer {
    /// 创建计时器并立即开始计时
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            remaining: duration,
            turn_start: Some(Instant::now()),
            paused: false,
        }
    }

    /// 每回合时长
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// 修改每回合时长，下次重置时生效
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// 本回合剩余时间
    pub fn remaining(&self) -> Duration {
        match self.turn_start {
            Some(start) if !self.paused => self.remaining.saturating_sub(start.elapsed()),
            _ => self.remaining,
        }
    }

    /// 剩余整秒数（向上取整，便于显示）
    pub fn remaining_secs(&self) -> u64 {
        let remaining = self.remaining();
        remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
    }

    /// 是否到期
    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// 换手：重置为完整时长（保持暂停状态）
    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.turn_start = if self.paused { None } else { Some(Instant::now()) };
    }

    /// 暂停计时器
    pub fn pause(&mut self) {
        if !self.paused {
            // 保存当前剩余时间
            self.remaining = self.remaining();
            self.turn_start = None;
            self.paused = true;
        }
    }

    /// 恢复计时器
    pub fn resume(&mut self) {
        if self.paused {
            self.turn_start = Some(Instant::now());
            self.paused = false;
        }
    }

    /// 是否暂停
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
