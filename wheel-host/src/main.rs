use std::time::Duration;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wheel_host::{
    AiReply, AiResolution, AiWorker, Command, GameSession, GameSettings, TapOutcome, HELP,
};
use wheel_protocol::{Notation, TimeoutOutcome};

/// 终端宿主
struct App {
    session: GameSession,
    worker: AiWorker,
    ai_tx: mpsc::Sender<AiReply>,
}

enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志（输出到 stderr，不干扰棋盘显示）
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("wheel_host=info".parse()?))
        .init();

    info!("轮盘跳棋启动中...");

    let settings = GameSettings::load().unwrap_or_else(|e| {
        warn!("加载设置失败，使用默认设置: {:#}", e);
        GameSettings::default()
    });

    let (ai_tx, mut ai_rx) = mpsc::channel(4);
    let mut app = App {
        session: GameSession::new(settings),
        worker: AiWorker::new(),
        ai_tx,
    };
    let mut rng = ChaCha8Rng::from_entropy();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick = tokio::time::interval(Duration::from_secs(1));

    println!("{}", HELP);
    app.print_board();

    loop {
        app.spawn_ai_turn();

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("读取输入失败")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match app.handle_line(&line) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => println!("错误: {:#}", e),
                }
            }
            _ = tick.tick() => {
                if let Some(outcome) = app.session.tick(&mut rng) {
                    match outcome {
                        TimeoutOutcome::Penalized { side, removed } => {
                            println!("{} 超时，被移除 {}", side, removed)
                        }
                        TimeoutOutcome::Passed { side } => println!("{} 超时，换手", side),
                    }
                    app.print_board();
                }
            }
            Some(reply) = ai_rx.recv() => {
                match app.session.finish_ai_turn(reply) {
                    Ok(AiResolution::Applied(mv)) => {
                        println!("AI 走 {}", mv);
                        app.print_board();
                    }
                    Ok(AiResolution::Discarded) => {}
                    Ok(AiResolution::NoMove) => app.print_board(),
                    Err(e) => error!("AI 走法无效: {}", e),
                }
            }
        }
    }

    info!("再见");
    Ok(())
}

impl App {
    /// 轮到 AI 时在后台发起计算
    fn spawn_ai_turn(&mut self) {
        let Some(ticket) = self.session.begin_ai_turn() else {
            return;
        };
        println!("AI({}) 思考中...", ticket.difficulty);

        let worker = self.worker.clone();
        let tx = self.ai_tx.clone();
        tokio::spawn(async move {
            let fallback = ticket.clone();
            let reply = match worker.think(ticket).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!("AI 计算失败: {:#}", e);
                    AiReply { ticket: fallback, mv: None }
                }
            };
            // 接收端关闭说明程序正在退出
            let _ = tx.send(reply).await;
        });
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let command: Command = line.parse()?;

        match command {
            Command::Tap(node) => match self.session.tap(node) {
                TapOutcome::Selected(node) => {
                    let targets: Vec<String> =
                        self.session.targets().iter().map(|n| n.to_string()).collect();
                    println!("选中 {}，可走: {}", node, targets.join(" "));
                }
                TapOutcome::Deselected => println!("取消选择"),
                TapOutcome::Moved(mv) => {
                    println!("走 {}", mv);
                    self.print_board();
                }
                TapOutcome::Ignored(reason) => println!("无效点击: {:?}", reason),
            },
            Command::Move(text) => {
                let mv = Notation::resolve(self.session.state(), &text)?;
                self.session.submit(mv)?;
                println!("走 {}", mv);
                self.print_board();
            }
            Command::New => {
                self.session.reset();
                self.print_board();
            }
            Command::Position(fen) => {
                self.session.start_from(&fen)?;
                self.print_board();
            }
            Command::Record => {
                let json = self.session.record().to_json().context("序列化棋谱失败")?;
                println!("{}", json);
            }
            Command::Difficulty(difficulty) => {
                self.update_settings(|s| s.difficulty = difficulty);
                println!("难度: {}", difficulty);
            }
            Command::Timer(secs) => {
                let mut applied = secs;
                self.update_settings(|s| applied = s.set_timer_duration(secs));
                println!("回合时长: {} 秒（下一回合生效）", applied);
            }
            Command::Ai(side) => {
                self.update_settings(|s| s.ai_side = side);
                match side {
                    Some(side) => println!("AI 执 {}", side),
                    None => println!("双人对战"),
                }
            }
            Command::Board => self.print_board(),
            Command::Help => println!("{}", HELP),
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn update_settings(&mut self, change: impl FnOnce(&mut GameSettings)) {
        let mut settings = self.session.settings().clone();
        change(&mut settings);
        if let Err(e) = settings.save() {
            warn!("保存设置失败: {:#}", e);
        }
        self.session.apply_settings(settings);
    }

    fn print_board(&self) {
        let state = self.session.state();
        println!("{}", state.board);

        if let Some(outcome) = self.session.outcome() {
            println!(
                "对局结束：{} 胜（{:?}），剩余 A {} / B {}",
                outcome.result.winner(),
                outcome.result.reason(),
                outcome.score.a,
                outcome.score.b
            );
            return;
        }

        let mut status = format!(
            "{} 走子，剩余 {} 秒",
            state.turn,
            self.session.timer().remaining_secs()
        );
        if let Some(node) = state.must_continue_from {
            status.push_str(&format!("，必须从 {} 继续吃子", node));
        }
        println!("{}", status);
    }
}
