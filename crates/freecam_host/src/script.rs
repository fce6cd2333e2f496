//! Line-oriented host script.
//!
//! One instruction per line, blank lines and `#` comments are skipped:
//!
//! ```text
//! join alice 100.5 64 -20.25 90 -15
//! cmd alice /freecam --speed 8
//! break alice
//! move alice 0 70 0
//! hurt alice
//! status
//! leave alice
//! ```

use freecam::command::parse_flag;
use freecam::{Position, Rotation};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown instruction `{0}`")]
    UnknownInstruction(String),

    #[error("`{instruction}` needs {what}")]
    MissingArgument {
        instruction: &'static str,
        what: &'static str,
    },

    #[error("`{0}` is not a number")]
    InvalidNumber(String),

    #[error("expected on or off, got `{0}`")]
    InvalidSwitch(String),

    #[error("unexpected `{0}`")]
    TrailingArgument(String),

    #[error("no player named `{0}`")]
    UnknownPlayer(String),

    #[error("`{0}` has already joined")]
    AlreadyJoined(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Join {
        name: String,
        position: Option<Position>,
        rotation: Option<Rotation>,
    },
    Leave {
        name: String,
    },
    Move {
        name: String,
        position: Position,
        rotation: Option<Rotation>,
    },
    /// A chat command typed by the player, e.g. `/freecam --speed 3`.
    Command {
        name: String,
        args: String,
    },
    BreakBlock {
        name: String,
    },
    DamageBlock {
        name: String,
    },
    Hurt {
        name: String,
    },
    Status {
        name: Option<String>,
    },
    DropPackets {
        name: String,
        on: bool,
    },
    LegacyClient {
        name: String,
        on: bool,
    },
}

struct Args<'a> {
    instruction: &'static str,
    tokens: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn token(&mut self) -> Option<&'a str> {
        self.tokens.next()
    }

    fn require(&mut self, what: &'static str) -> Result<&'a str, ScriptError> {
        self.token().ok_or(ScriptError::MissingArgument {
            instruction: self.instruction,
            what,
        })
    }

    fn name(&mut self) -> Result<String, ScriptError> {
        self.require("a player name").map(str::to_string)
    }

    fn number<T: std::str::FromStr>(&mut self, what: &'static str) -> Result<T, ScriptError> {
        let token = self.require(what)?;
        token
            .parse()
            .map_err(|_| ScriptError::InvalidNumber(token.to_string()))
    }

    fn position(&mut self) -> Result<Position, ScriptError> {
        Ok(Position::new(
            self.number("x y z")?,
            self.number("x y z")?,
            self.number("x y z")?,
        ))
    }

    /// Optional trailing `yaw pitch`.
    fn rotation(&mut self) -> Result<Option<Rotation>, ScriptError> {
        match self.token() {
            None => Ok(None),
            Some(yaw) => {
                let yaw = yaw
                    .parse()
                    .map_err(|_| ScriptError::InvalidNumber(yaw.to_string()))?;
                Ok(Some(Rotation::new(yaw, self.number("yaw pitch")?)))
            }
        }
    }

    fn switch(&mut self) -> Result<bool, ScriptError> {
        let token = self.require("on or off")?;
        parse_flag(token).ok_or_else(|| ScriptError::InvalidSwitch(token.to_string()))
    }

    fn finish(mut self) -> Result<(), ScriptError> {
        match self.token() {
            Some(extra) => Err(ScriptError::TrailingArgument(extra.to_string())),
            None => Ok(()),
        }
    }
}

/// Parses one script line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<Instruction>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line, ""));
    let keyword = keyword.to_ascii_lowercase();

    let instruction: &'static str = match keyword.as_str() {
        "join" => "join",
        "leave" => "leave",
        "move" => "move",
        "cmd" => "cmd",
        "break" => "break",
        "damage-block" => "damage-block",
        "hurt" => "hurt",
        "status" => "status",
        "drop-packets" => "drop-packets",
        "legacy-client" => "legacy-client",
        _ => return Err(ScriptError::UnknownInstruction(keyword)),
    };
    let mut args = Args {
        instruction,
        tokens: rest.split_whitespace(),
    };

    let parsed = match instruction {
        "join" => {
            let name = args.name()?;
            let position = match args.token() {
                None => None,
                Some(x) => {
                    let x = x
                        .parse()
                        .map_err(|_| ScriptError::InvalidNumber(x.to_string()))?;
                    Some(Position::new(x, args.number("x y z")?, args.number("x y z")?))
                }
            };
            let rotation = match position {
                Some(_) => args.rotation()?,
                None => None,
            };
            Instruction::Join {
                name,
                position,
                rotation,
            }
        }
        "leave" => Instruction::Leave { name: args.name()? },
        "move" => Instruction::Move {
            name: args.name()?,
            position: args.position()?,
            rotation: args.rotation()?,
        },
        "cmd" => {
            // Everything after the name is handed over untouched.
            let rest = rest.trim_start();
            let (name, command) = rest
                .split_once(char::is_whitespace)
                .unwrap_or((rest, ""));
            if name.is_empty() {
                return Err(ScriptError::MissingArgument {
                    instruction,
                    what: "a player name",
                });
            }
            return Ok(Some(Instruction::Command {
                name: name.to_string(),
                args: command.trim().to_string(),
            }));
        }
        "break" => Instruction::BreakBlock { name: args.name()? },
        "damage-block" => Instruction::DamageBlock { name: args.name()? },
        "hurt" => Instruction::Hurt { name: args.name()? },
        "status" => Instruction::Status {
            name: args.token().map(str::to_string),
        },
        "drop-packets" => Instruction::DropPackets {
            name: args.name()?,
            on: args.switch()?,
        },
        _ => Instruction::LegacyClient {
            name: args.name()?,
            on: args.switch()?,
        },
    };

    args.finish()?;
    Ok(Some(parsed))
}
