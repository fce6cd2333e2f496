//! Parsing of `/freecam` arguments.
//!
//! Accepted forms:
//! - `/freecam` (toggle)
//! - `/freecam --speed 3`, `/freecam --speed=3`, `/freecam 3` (legacy positional speed)
//! - `/freecam --show-player false`, `/freecam --show-player=off`
//!
//! Parsing is all-or-nothing: one bad field rejects the whole command.
//! Numeric speeds outside 1–10 are accepted here and clamped by the store.

use crate::error::ValidationError;

/// Names the command is registered under.
pub const COMMAND_NAMES: [&str; 2] = ["freecam", "fc"];

const SPEED: &str = "speed";
const SHOW_PLAYER: &str = "show-player";

/// Optional preference updates carried by one command invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleRequest {
    pub speed: Option<i64>,
    pub show_player: Option<bool>,
}

impl ToggleRequest {
    /// Plain toggle without preference updates.
    pub fn toggle() -> Self {
        Self::default()
    }

    pub fn with_speed(mut self, speed: i64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_show_player(mut self, show_player: bool) -> Self {
        self.show_player = Some(show_player);
        self
    }

    /// `true` if at least one preference is being updated.
    pub fn has_preferences(&self) -> bool {
        self.speed.is_some() || self.show_player.is_some()
    }
}

/// Parses a boolean flag value.
pub fn parse_flag(token: &str) -> Option<bool> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

fn parse_speed(token: &str) -> Result<i64, ValidationError> {
    token
        .parse::<i32>()
        .map(i64::from)
        .map_err(|_| ValidationError::InvalidSpeed(token.to_string()))
}

fn is_command_name(token: &str) -> bool {
    let name = token.strip_prefix('/').unwrap_or(token);
    COMMAND_NAMES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(name))
}

/// Parses the raw argument text of a `/freecam` invocation.
///
/// The text may start with the command name itself.
pub fn parse_args(input: &str) -> Result<ToggleRequest, ValidationError> {
    let mut tokens = input.split_whitespace().peekable();
    if tokens.peek().is_some_and(|first| is_command_name(first)) {
        tokens.next();
    }

    let mut request = ToggleRequest::default();

    while let Some(token) = tokens.next() {
        let Some(option) = token.strip_prefix("--") else {
            // Legacy form: `/freecam 7`
            if request.speed.is_some() {
                return Err(ValidationError::Duplicate(SPEED));
            }
            if token.parse::<i64>().is_err() {
                return Err(ValidationError::UnknownArgument(token.to_string()));
            }
            request.speed = Some(parse_speed(token)?);
            continue;
        };

        let (name, inline) = match option.split_once('=') {
            Some((name, value)) => (name.to_ascii_lowercase(), Some(value)),
            None => (option.to_ascii_lowercase(), None),
        };

        // A following `--option` is never taken as a value.
        let mut value = || match inline {
            Some(v) if !v.is_empty() => Some(v),
            Some(_) => None,
            None => tokens.next_if(|next| !next.starts_with("--")),
        };

        match name.as_str() {
            SPEED => {
                if request.speed.is_some() {
                    return Err(ValidationError::Duplicate(SPEED));
                }
                let raw = value().ok_or(ValidationError::MissingSpeedValue)?;
                request.speed = Some(parse_speed(raw)?);
            }
            SHOW_PLAYER => {
                if request.show_player.is_some() {
                    return Err(ValidationError::Duplicate(SHOW_PLAYER));
                }
                let raw = value().ok_or(ValidationError::MissingShowPlayerValue)?;
                let flag = parse_flag(raw)
                    .ok_or_else(|| ValidationError::InvalidShowPlayer(raw.to_string()))?;
                request.show_player = Some(flag);
            }
            _ => return Err(ValidationError::UnknownArgument(token.to_string())),
        }
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_toggle() {
        for input in ["", "/freecam", "freecam", "/fc", "  /FC  "] {
            assert_eq!(parse_args(input), Ok(ToggleRequest::toggle()), "{input:?}");
        }
    }

    #[test]
    fn test_speed_forms() {
        let expected = Ok(ToggleRequest::toggle().with_speed(3));
        assert_eq!(parse_args("/freecam --speed 3"), expected);
        assert_eq!(parse_args("/freecam --speed=3"), expected);
        assert_eq!(parse_args("/freecam 3"), expected);
        assert_eq!(parse_args("--SPEED 3"), expected);
    }

    #[test]
    fn test_out_of_range_speed_is_passed_through() {
        assert_eq!(
            parse_args("--speed 42"),
            Ok(ToggleRequest::toggle().with_speed(42))
        );
        assert_eq!(
            parse_args("--speed -4"),
            Ok(ToggleRequest::toggle().with_speed(-4))
        );
    }

    #[test]
    fn test_speed_must_be_integer() {
        assert_eq!(
            parse_args("--speed fast"),
            Err(ValidationError::InvalidSpeed("fast".into()))
        );
        assert_eq!(
            parse_args("--speed 99999999999"),
            Err(ValidationError::InvalidSpeed("99999999999".into()))
        );
        assert_eq!(parse_args("--speed"), Err(ValidationError::MissingSpeedValue));
    }

    #[test]
    fn test_show_player_tokens() {
        for (token, flag) in [
            ("true", true),
            ("YES", true),
            ("1", true),
            ("on", true),
            ("false", false),
            ("No", false),
            ("0", false),
            ("off", false),
        ] {
            assert_eq!(
                parse_args(&format!("--show-player {token}")),
                Ok(ToggleRequest::toggle().with_show_player(flag)),
                "{token}"
            );
        }
    }

    #[test]
    fn test_show_player_requires_value() {
        assert_eq!(
            parse_args("/freecam --show-player"),
            Err(ValidationError::MissingShowPlayerValue)
        );
        assert_eq!(
            parse_args("/freecam --show-player="),
            Err(ValidationError::MissingShowPlayerValue)
        );
        assert_eq!(
            parse_args("/freecam --show-player --speed 3"),
            Err(ValidationError::MissingShowPlayerValue)
        );
    }

    #[test]
    fn test_invalid_show_player_rejects_whole_command() {
        assert_eq!(
            parse_args("--speed 4 --show-player maybe"),
            Err(ValidationError::InvalidShowPlayer("maybe".into()))
        );
    }

    #[test]
    fn test_both_options() {
        assert_eq!(
            parse_args("/fc --show-player=off --speed 9"),
            Ok(ToggleRequest::toggle().with_speed(9).with_show_player(false))
        );
    }

    #[test]
    fn test_duplicates_and_unknowns() {
        assert_eq!(
            parse_args("--speed 1 --speed 2"),
            Err(ValidationError::Duplicate("speed"))
        );
        assert_eq!(parse_args("4 --speed 2"), Err(ValidationError::Duplicate("speed")));
        assert_eq!(
            parse_args("--fov 90"),
            Err(ValidationError::UnknownArgument("--fov".into()))
        );
        assert_eq!(
            parse_args("banana"),
            Err(ValidationError::UnknownArgument("banana".into()))
        );
    }

    #[test]
    fn test_has_preferences() {
        assert!(!ToggleRequest::toggle().has_preferences());
        assert!(ToggleRequest::toggle().with_speed(2).has_preferences());
        assert!(ToggleRequest::toggle().with_show_player(true).has_preferences());
    }
}
