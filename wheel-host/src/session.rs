//! 对局控制
//!
//! `GameSession` 持有唯一的 `GameState`，负责：
//! - 把点击序列翻译为走法（选择 / 改选 / 取消 / 走子）
//! - 计时到期时的惩罚策略
//! - AI 回合的发起与结果回收（用代数丢弃重置前的过期结果）
//! - 同步维护棋谱

use rand::Rng;
use tracing::{debug, info, warn};
use wheel_protocol::{
    RuleError, Difficulty, GameOutcome, GameRecord, GameState, Move, NodeId, Rules, Side,
    Snapshot, TimeoutOutcome,
};

use crate::settings::GameSettings;
use crate::timer::TurnTimer;

/// 一次点击的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// 选中了一个棋子
    Selected(NodeId),
    /// 取消选择
    Deselected,
    /// 走了一步
    Moved(Move),
    /// 点击无效，状态不变
    Ignored(IgnoreReason),
}

/// 点击被忽略的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// 游戏已结束
    GameOver,
    /// AI 的回合或 AI 正在思考
    AiTurn,
    /// 该节点没有可走的己方棋子
    NotSelectable,
    /// 连续吃子中不能取消选择
    ChainInProgress,
}

/// 一次 AI 计算请求
#[derive(Debug, Clone)]
pub struct AiTicket {
    /// 发起时的对局代数
    pub generation: u64,
    pub state: GameState,
    pub side: Side,
    pub difficulty: Difficulty,
}

/// AI 计算结果
#[derive(Debug, Clone)]
pub struct AiReply {
    pub ticket: AiTicket,
    pub mv: Option<Move>,
}

/// AI 结果的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiResolution {
    /// 已执行
    Applied(Move),
    /// 对局已重置或读档，结果作废
    Discarded,
    /// AI 无子可走
    NoMove,
}

/// 一局游戏
pub struct GameSession {
    state: GameState,
    selected: Option<NodeId>,
    timer: TurnTimer,
    record: GameRecord,
    settings: GameSettings,
    /// 每次重置或读档加一
    generation: u64,
    ai_thinking: bool,
}

impl GameSession {
    /// 按设置创建新对局
    pub fn new(settings: GameSettings) -> Self {
        let timer = TurnTimer::new(settings.turn_duration());
        let record = Self::new_record(&settings);
        Self {
            state: GameState::initial(),
            selected: None,
            timer,
            record,
            settings,
            generation: 0,
            ai_thinking: false,
        }
    }

    fn new_record(settings: &GameSettings) -> GameRecord {
        let (player_a, player_b) = settings.player_labels();
        let mut record = GameRecord::new(player_a, player_b);
        record.set_turn_secs(settings.timer_duration_secs);
        if let Some(side) = settings.ai_side {
            record.set_ai(side, settings.difficulty);
        }
        record
    }

    /// 重新开始
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = GameState::initial();
        self.record = Self::new_record(&self.settings);
        self.restart_timer();
        info!("新对局开始（第 {} 局）", self.generation);
    }

    /// 从棋谱恢复对局，事件逐个校验
    pub fn load(&mut self, record: GameRecord) -> Result<(), RuleError> {
        let state = record.replay()?;

        self.generation += 1;
        self.state = state;
        self.record = record;
        self.restart_timer();
        info!(
            "棋谱载入完成：{} 个事件，{} 走子",
            self.record.events.len(),
            self.state.turn
        );
        Ok(())
    }

    /// 从自定义局面开始新对局
    pub fn start_from(&mut self, fen: &str) -> Result<(), RuleError> {
        let mut record = Self::new_record(&self.settings);
        record.initial_fen = fen.trim().to_string();
        self.load(record)
    }

    fn restart_timer(&mut self) {
        self.selected = self.state.must_continue_from;
        self.ai_thinking = false;
        self.timer.set_duration(self.settings.turn_duration());
        self.timer.resume();
        self.timer.reset();
        if Rules::is_terminal(&self.state) {
            self.timer.pause();
        }
    }

    /// 修改设置：难度对下一次 AI 计算生效，回合时长对下一次换手生效
    ///
    /// 改变 AI 执子方会作废进行中的 AI 计算。
    pub fn apply_settings(&mut self, settings: GameSettings) {
        if settings.ai_side != self.settings.ai_side && self.ai_thinking {
            self.generation += 1;
            self.ai_thinking = false;
            self.timer.resume();
            info!("AI 执子方已改变，放弃进行中的 AI 计算");
        }
        self.timer.set_duration(settings.turn_duration());
        self.settings = settings;
        self.record.set_turn_secs(self.settings.timer_duration_secs);
        if let Some(side) = self.settings.ai_side {
            self.record.set_ai(side, self.settings.difficulty);
        }
    }

    /// 处理一次点击
    pub fn tap(&mut self, node: NodeId) -> TapOutcome {
        if Rules::is_terminal(&self.state) {
            return TapOutcome::Ignored(IgnoreReason::GameOver);
        }
        if self.ai_thinking || self.is_ai_turn() {
            return TapOutcome::Ignored(IgnoreReason::AiTurn);
        }

        let legal = Rules::legal_moves(&self.state);
        let selectable = legal.iter().any(|mv| mv.from() == node);

        let Some(selected) = self.selected else {
            return if selectable {
                self.selected = Some(node);
                TapOutcome::Selected(node)
            } else {
                TapOutcome::Ignored(IgnoreReason::NotSelectable)
            };
        };

        if node == selected {
            if self.state.must_continue_from.is_some() {
                return TapOutcome::Ignored(IgnoreReason::ChainInProgress);
            }
            self.selected = None;
            return TapOutcome::Deselected;
        }

        match legal.iter().find(|mv| mv.from() == selected && mv.to() == node) {
            Some(&mv) => {
                self.apply(mv);
                TapOutcome::Moved(mv)
            }
            None if selectable => {
                self.selected = Some(node);
                TapOutcome::Selected(node)
            }
            None => TapOutcome::Ignored(IgnoreReason::NotSelectable),
        }
    }

    /// 人类玩家直接提交走法
    pub fn submit(&mut self, mv: Move) -> Result<(), RuleError> {
        if self.ai_thinking || self.is_ai_turn() {
            return Err(RuleError::NotYourTurn);
        }
        self.play(mv)
    }

    fn play(&mut self, mv: Move) -> Result<(), RuleError> {
        if Rules::is_terminal(&self.state) {
            return Err(RuleError::GameOver);
        }
        if !Rules::legal_moves(&self.state).contains(&mv) {
            warn!("拒绝非法走法: {}", mv);
            return Err(RuleError::IllegalMove {
                notation: mv.to_string(),
            });
        }
        self.apply(mv);
        Ok(())
    }

    /// 执行已确认合法的走法
    fn apply(&mut self, mv: Move) {
        let mover = self.state.turn;
        self.state = Rules::apply_move(&self.state, mv);
        self.record.add_move(mv);
        self.selected = self.state.must_continue_from;

        info!("{} 走 {}", mover, mv);
        if self.state.turn != mover {
            self.timer.reset();
        } else {
            debug!("{} 继续吃子", mover);
        }
        self.check_game_over();
    }

    fn check_game_over(&mut self) {
        if let Some(outcome) = Rules::outcome(&self.state) {
            info!(
                "对局结束：{} 胜（{:?}），剩余 A {} / B {}",
                outcome.result.winner(),
                outcome.result.reason(),
                outcome.score.a,
                outcome.score.b
            );
            self.record.set_result(outcome);
            self.selected = None;
            self.timer.pause();
        }
    }

    /// 每秒调用一次；计时到期时执行超时处理
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TimeoutOutcome> {
        if self.timer.is_expired() {
            self.on_timer_expired(rng)
        } else {
            None
        }
    }

    /// 计时到期
    ///
    /// AI 一方不受惩罚，只重新计时；其他情况按惩罚策略处理并换手。
    pub fn on_timer_expired<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TimeoutOutcome> {
        if Rules::is_terminal(&self.state) || self.ai_thinking {
            return None;
        }
        if self.is_ai_turn() {
            self.timer.reset();
            return None;
        }

        let (next, outcome) = Rules::apply_timeout(&self.state, rng);
        self.state = next;
        self.record.add_timeout(outcome);
        self.selected = None;
        self.timer.reset();
        info!("{} 超时: {:?}", outcome.side(), outcome);
        self.check_game_over();
        Some(outcome)
    }

    /// 轮到 AI 且没有进行中的计算时，发起一次 AI 计算并暂停计时
    pub fn begin_ai_turn(&mut self) -> Option<AiTicket> {
        if self.ai_thinking || !self.is_ai_turn() || Rules::is_terminal(&self.state) {
            return None;
        }

        self.ai_thinking = true;
        self.timer.pause();
        debug!("AI 回合开始（第 {} 局）", self.generation);
        Some(AiTicket {
            generation: self.generation,
            state: self.state.clone(),
            side: self.state.turn,
            difficulty: self.settings.difficulty,
        })
    }

    /// 回收 AI 计算结果
    pub fn finish_ai_turn(&mut self, reply: AiReply) -> Result<AiResolution, RuleError> {
        if reply.ticket.generation != self.generation || !self.ai_thinking {
            warn!(
                "AI 计算期间对局已改变（第 {} 局 -> 第 {} 局），丢弃 AI 走法",
                reply.ticket.generation, self.generation
            );
            return Ok(AiResolution::Discarded);
        }

        self.ai_thinking = false;
        self.timer.resume();

        match reply.mv {
            Some(mv) => {
                self.play(mv)?;
                Ok(AiResolution::Applied(mv))
            }
            None => {
                warn!("AI 无法找到合法走法");
                self.check_game_over();
                Ok(AiResolution::NoMove)
            }
        }
    }

    fn is_ai_turn(&self) -> bool {
        self.settings.ai_side == Some(self.state.turn)
    }

    /// 当前状态
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// 供渲染使用的快照
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// 选中棋子可以到达的节点
    pub fn targets(&self) -> Vec<NodeId> {
        match self.selected {
            Some(from) => Rules::legal_moves(&self.state)
                .into_iter()
                .filter(|mv| mv.from() == from)
                .map(|mv| mv.to())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn timer(&self) -> &TurnTimer {
        &self.timer
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_ai_thinking(&self) -> bool {
        self.ai_thinking
    }

    /// 终局信息（胜方与剩余棋子数）
    pub fn outcome(&self) -> Option<GameOutcome> {
        Rules::outcome(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use wheel_protocol::{Fen, RecordEvent, WinReason};

    fn node(name: &str) -> NodeId {
        name.parse().unwrap()
    }

    fn local_settings() -> GameSettings {
        GameSettings {
            ai_side: None,
            ..GameSettings::default()
        }
    }

    fn session_from_fen(settings: GameSettings, fen: &str) -> GameSession {
        let mut record = GameRecord::from_fen("a".to_string(), "b".to_string(), fen.to_string());
        record.set_turn_secs(settings.timer_duration_secs);
        let mut session = GameSession::new(settings);
        session.load(record).unwrap();
        session
    }

    #[test]
    fn test_tap_select_and_move() {
        let mut session = GameSession::new(local_settings());

        // 外环棋子无路可走
        assert_eq!(session.tap(node("O0")), TapOutcome::Ignored(IgnoreReason::NotSelectable));
        assert_eq!(session.tap(node("I2")), TapOutcome::Selected(node("I2")));
        assert_eq!(session.targets(), vec![NodeId::CENTER]);

        // 改选
        assert_eq!(session.tap(node("I3")), TapOutcome::Selected(node("I3")));
        // 取消
        assert_eq!(session.tap(node("I3")), TapOutcome::Deselected);
        assert_eq!(session.selected(), None);

        session.tap(node("I3"));
        let outcome = session.tap(NodeId::CENTER);
        assert_eq!(
            outcome,
            TapOutcome::Moved(Move::Step { from: node("I3"), to: NodeId::CENTER })
        );
        assert_eq!(session.state().turn, Side::B);
        assert_eq!(session.record().move_count(), 1);
    }

    #[test]
    fn test_tap_forces_chain_selection() {
        let mut session = session_from_fen(local_settings(), "ab1b8/12/12/12/1 a");

        session.tap(node("O0"));
        assert!(matches!(session.tap(node("O2")), TapOutcome::Moved(_)));
        assert_eq!(session.selected(), Some(node("O2")));
        assert_eq!(session.state().turn, Side::A);

        // 连续吃子中不能取消
        assert_eq!(session.tap(node("O2")), TapOutcome::Ignored(IgnoreReason::ChainInProgress));
        assert!(matches!(session.tap(node("O4")), TapOutcome::Moved(_)));
        assert!(session.outcome().is_some());
        assert_eq!(session.tap(node("O4")), TapOutcome::Ignored(IgnoreReason::GameOver));
    }

    #[test]
    fn test_human_blocked_on_ai_turn() {
        let mut session = GameSession::new(GameSettings::default());
        session.submit(Move::Step { from: node("I0"), to: NodeId::CENTER }).unwrap();
        assert_eq!(session.state().turn, Side::B);

        assert_eq!(session.tap(node("I6")), TapOutcome::Ignored(IgnoreReason::AiTurn));
        assert_eq!(
            session.submit(Move::Jump { from: node("I6"), over: NodeId::CENTER, to: node("I0") }),
            Err(RuleError::NotYourTurn)
        );
    }

    #[test]
    fn test_submit_rejects_illegal_move() {
        let mut session = GameSession::new(local_settings());
        let before = session.state().clone();
        let err = session.submit(Move::Step { from: node("O0"), to: node("O1") });
        assert!(matches!(err, Err(RuleError::IllegalMove { .. })));
        assert_eq!(session.state(), &before);
        assert!(session.record().events.is_empty());
    }

    #[test]
    fn test_ai_turn_round_trip() {
        let mut session = GameSession::new(GameSettings::default());
        assert!(session.begin_ai_turn().is_none());

        session.submit(Move::Step { from: node("I0"), to: NodeId::CENTER }).unwrap();
        let ticket = session.begin_ai_turn().unwrap();
        assert_eq!(ticket.side, Side::B);
        assert!(session.is_ai_thinking());
        assert!(session.timer().is_paused());
        // 计算中不会重复发起
        assert!(session.begin_ai_turn().is_none());

        let mv = Move::Jump { from: node("I6"), over: NodeId::CENTER, to: node("I0") };
        let resolution = session.finish_ai_turn(AiReply { ticket, mv: Some(mv) }).unwrap();
        assert_eq!(resolution, AiResolution::Applied(mv));
        assert_eq!(session.state().turn, Side::A);
        assert!(!session.is_ai_thinking());
        assert!(!session.timer().is_paused());
    }

    #[test]
    fn test_stale_ai_reply_discarded() {
        let mut session = GameSession::new(GameSettings::default());
        session.submit(Move::Step { from: node("I0"), to: NodeId::CENTER }).unwrap();
        let ticket = session.begin_ai_turn().unwrap();

        session.reset();
        assert_eq!(session.state(), &GameState::initial());

        let mv = Move::Jump { from: node("I6"), over: NodeId::CENTER, to: node("I0") };
        let resolution = session.finish_ai_turn(AiReply { ticket, mv: Some(mv) }).unwrap();
        assert_eq!(resolution, AiResolution::Discarded);
        assert_eq!(session.state(), &GameState::initial());
    }

    #[test]
    fn test_ai_side_change_discards_pending_reply() {
        let mut session = GameSession::new(GameSettings::default());
        session.submit(Move::Step { from: node("I0"), to: NodeId::CENTER }).unwrap();
        let ticket = session.begin_ai_turn().unwrap();
        let before = session.state().clone();

        session.apply_settings(local_settings());
        assert!(!session.is_ai_thinking());
        assert!(!session.timer().is_paused());

        let mv = Move::Jump { from: node("I6"), over: NodeId::CENTER, to: node("I0") };
        let resolution = session.finish_ai_turn(AiReply { ticket, mv: Some(mv) }).unwrap();
        assert_eq!(resolution, AiResolution::Discarded);
        assert_eq!(session.state(), &before);

        // 现在由人类执 B
        assert_eq!(session.tap(node("I6")), TapOutcome::Selected(node("I6")));
    }

    #[test]
    fn test_difficulty_change_keeps_pending_reply() {
        let mut session = GameSession::new(GameSettings::default());
        session.submit(Move::Step { from: node("I0"), to: NodeId::CENTER }).unwrap();
        let ticket = session.begin_ai_turn().unwrap();

        session.apply_settings(GameSettings { difficulty: Difficulty::Hard, ..GameSettings::default() });
        assert!(session.is_ai_thinking());

        let mv = Move::Jump { from: node("I6"), over: NodeId::CENTER, to: node("I0") };
        let resolution = session.finish_ai_turn(AiReply { ticket, mv: Some(mv) }).unwrap();
        assert_eq!(resolution, AiResolution::Applied(mv));
    }

    #[test]
    fn test_timeout_penalizes_human() {
        let mut session = session_from_fen(local_settings(), "ab10/12/12/a11/1 a");
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let outcome = session.on_timer_expired(&mut rng).unwrap();
        assert_eq!(outcome, TimeoutOutcome::Penalized { side: Side::A, removed: node("O0") });
        assert_eq!(session.state().turn, Side::B);
        assert_eq!(session.state().board.count(Side::A), 1);
        assert!(matches!(session.record().events.last(), Some(RecordEvent::Timeout(_))));
        // 记录可以重放
        assert_eq!(session.record().replay().unwrap().board, session.state().board);
    }

    #[test]
    fn test_timeout_skipped_for_ai_side() {
        let settings = GameSettings { ai_side: Some(Side::A), ..GameSettings::default() };
        let mut session = session_from_fen(settings, "ab10/12/12/12/1 a");
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        assert_eq!(session.on_timer_expired(&mut rng), None);
        assert_eq!(session.state().turn, Side::A);
        assert_eq!(session.state().board.total(), 2);
    }

    #[test]
    fn test_tick_waits_for_expiry() {
        let mut session = GameSession::new(local_settings());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(session.tick(&mut rng), None);
        assert_eq!(session.state().turn, Side::A);
    }

    #[test]
    fn test_timeout_can_end_game() {
        let mut session = session_from_fen(local_settings(), "ab10/12/12/12/1 a");
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        session.on_timer_expired(&mut rng);

        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.result.winner(), Side::B);
        assert_eq!(outcome.result.reason(), WinReason::AllCaptured);
        assert_eq!(session.record().metadata.result, Some(outcome));
        assert!(session.timer().is_paused());
    }

    #[test]
    fn test_load_restores_chain() {
        let mut record = GameRecord::from_fen(
            "a".to_string(),
            "b".to_string(),
            "ab1b8/12/12/12/1 a".to_string(),
        );
        record.add_move(Move::Jump { from: node("O0"), over: node("O1"), to: node("O2") });

        let mut session = GameSession::new(local_settings());
        let generation = session.generation();
        session.load(record).unwrap();

        assert_eq!(session.generation(), generation + 1);
        assert_eq!(session.selected(), Some(node("O2")));
        assert_eq!(session.timer().remaining_secs(), 14);
        assert_eq!(Fen::to_fen(session.state()), "2ab8/12/12/12/1 a O2");
    }

    #[test]
    fn test_start_from_position() {
        let mut session = GameSession::new(GameSettings::default());
        session.start_from(" ab10/12/12/12/1 b ").unwrap();

        assert_eq!(session.state().turn, Side::B);
        assert_eq!(session.record().initial_fen, "ab10/12/12/12/1 b");
        assert_eq!(session.record().metadata.ai_side, Some(Side::B));
        assert!(session.begin_ai_turn().is_some());

        assert!(matches!(
            session.start_from("12/12/12/12 a"),
            Err(RuleError::InvalidFen { .. })
        ));
        assert_eq!(session.state().turn, Side::B);
    }

    #[test]
    fn test_load_rejects_bad_record() {
        let mut record = GameRecord::new("a".to_string(), "b".to_string());
        record.add_move(Move::Step { from: node("O0"), to: node("O1") });

        let mut session = GameSession::new(local_settings());
        assert!(session.load(record).is_err());
        assert_eq!(session.state(), &GameState::initial());
        assert_eq!(session.generation(), 0);
    }
}
