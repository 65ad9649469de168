//! 终端命令解析

use std::str::FromStr;

use thiserror::Error;
use wheel_protocol::{Difficulty, NodeId, Side};

/// 终端命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 点击一个节点
    Tap(NodeId),
    /// 直接走子，文本交给 `Notation::resolve` 解析
    Move(String),
    /// 重新开始
    New,
    /// 从局面文本开始新对局
    Position(String),
    /// 打印本局棋谱 (JSON)
    Record,
    /// 修改难度
    Difficulty(Difficulty),
    /// 修改回合时长（秒）
    Timer(u64),
    /// AI 执哪一方；None 为双人对战
    Ai(Option<Side>),
    /// 打印棋盘
    Board,
    Help,
    Quit,
}

/// 命令解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("missing argument for `{0}`")]
    MissingArgument(&'static str),

    #[error("invalid argument for `{command}`: {value}")]
    InvalidArgument { command: &'static str, value: String },
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let mut parts = line.split_whitespace();
        let head = parts.next().ok_or(CommandError::Empty)?;
        let arg = parts.next();
        let rest: Vec<&str> = parts.collect();

        let keyword = head.to_ascii_lowercase();
        let command = match keyword.as_str() {
            "new" | "reset" => Command::New,
            "record" => Command::Record,
            "board" | "b" => Command::Board,
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "move" | "mv" => return Ok(Command::Move(tail(line, head, "move")?)),
            "position" | "fen" => return Ok(Command::Position(tail(line, head, "position")?)),
            "difficulty" | "level" => {
                let value = required(arg, "difficulty")?;
                let difficulty = value.parse().map_err(|_| CommandError::InvalidArgument {
                    command: "difficulty",
                    value: value.to_string(),
                })?;
                Command::Difficulty(difficulty)
            }
            "timer" => {
                let value = required(arg, "timer")?;
                let secs = value.parse().map_err(|_| CommandError::InvalidArgument {
                    command: "timer",
                    value: value.to_string(),
                })?;
                Command::Timer(secs)
            }
            "ai" => {
                let value = required(arg, "ai")?;
                let side = match value.to_ascii_lowercase().as_str() {
                    "a" => Some(Side::A),
                    "b" => Some(Side::B),
                    "off" | "none" => None,
                    _ => {
                        return Err(CommandError::InvalidArgument {
                            command: "ai",
                            value: value.to_string(),
                        })
                    }
                };
                Command::Ai(side)
            }
            _ => return parse_board_input(line, head, arg),
        };

        if !rest.is_empty() {
            return Err(CommandError::InvalidArgument {
                command: "arguments",
                value: rest.join(" "),
            });
        }
        Ok(command)
    }
}

/// 节点名为点击，两个节点名或带 `-` 的记号为走子
fn parse_board_input(line: &str, head: &str, arg: Option<&str>) -> Result<Command, CommandError> {
    if head.contains('-') {
        return Ok(Command::Move(line.to_string()));
    }
    let node: NodeId = head
        .parse()
        .map_err(|_| CommandError::Unknown(head.to_string()))?;
    match arg {
        None => Ok(Command::Tap(node)),
        Some(_) => Ok(Command::Move(line.to_string())),
    }
}

/// 关键字之后的整行（局面和记号中可能含空格）
fn tail(line: &str, head: &str, command: &'static str) -> Result<String, CommandError> {
    let text = line[head.len()..].trim();
    if text.is_empty() {
        return Err(CommandError::MissingArgument(command));
    }
    Ok(text.to_string())
}

fn required<'a>(arg: Option<&'a str>, command: &'static str) -> Result<&'a str, CommandError> {
    arg.ok_or(CommandError::MissingArgument(command))
}

/// 帮助文本
pub const HELP: &str = "\
命令:
  <节点>                 点击节点（选择 / 改选 / 取消 / 走子），如 I3、C
  <起点> <终点>          直接走子，如 I3 C
  <记号>                 完整记号走子，如 O0xO1-O2
  new                    重新开始
  position <局面>        从局面文本开始，如 position ab10/12/12/12/1 a
  record                 打印本局棋谱 (JSON)
  difficulty <easy|mid|hard>
  timer <5-30>           回合时长（秒）
  ai <a|b|off>           AI 执哪一方
  board                  打印棋盘
  help                   显示帮助
  quit                   退出";
