use std::str::FromStr;

use crate::error::MascotError;
use crate::math::Vector2;

/// One line of driver input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Feed,
    Provoke,
    Scam,
    PointerDown(Vector2),
    PointerMove(Vector2),
    PointerUp(Vector2),
    Reload,
    Unload,
    Quit,
}

impl FromStr for Command {
    type Err = MascotError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Err(MascotError::InvalidCommand("empty line".into()));
        };
        let args: Vec<&str> = parts.collect();

        let cmd = match verb {
            "feed" => Command::Feed,
            "provoke" | "mood" => Command::Provoke,
            "scam" => Command::Scam,
            "down" => Command::PointerDown(parse_ndc(verb, &args)?),
            "move" => Command::PointerMove(parse_ndc(verb, &args)?),
            "up" => Command::PointerUp(parse_ndc(verb, &args)?),
            "reload" => Command::Reload,
            "unload" => Command::Unload,
            "quit" | "exit" => Command::Quit,
            other => return Err(MascotError::InvalidCommand(format!("unknown command `{other}`"))),
        };

        let takes_args = matches!(
            cmd,
            Command::PointerDown(_) | Command::PointerMove(_) | Command::PointerUp(_)
        );
        if !takes_args && !args.is_empty() {
            return Err(MascotError::InvalidCommand(format!(
                "`{verb}` takes no arguments"
            )));
        }
        Ok(cmd)
    }
}

fn parse_ndc(verb: &str, args: &[&str]) -> Result<Vector2, MascotError> {
    let &[x, y] = args else {
        return Err(MascotError::InvalidCommand(format!(
            "`{verb}` expects X Y, got {} argument(s)",
            args.len()
        )));
    };
    let coord = |s: &str| {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| MascotError::InvalidCommand(format!("`{verb}`: bad coordinate `{s}`")))
    };
    Ok(Vector2::new(coord(x)?, coord(y)?))
}
