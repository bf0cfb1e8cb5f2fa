use std::fmt;

use serde::Serialize;

use crate::tracker::Target;

/// One recorded pointer gesture
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "gesture", rename_all = "lowercase")]
pub enum Gesture {
    Start { item: String },
    Over { target: Target, offset: Option<f32> },
    Leave { target: Target },
    Drop { target: Target, offset: Option<f32> },
    Cancel,
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gesture::Start { item } => write!(f, "start {}", item),
            Gesture::Over { target, offset } => write_with_offset(f, "over", target, *offset),
            Gesture::Leave { target } => write!(f, "leave {}", target),
            Gesture::Drop { target, offset } => write_with_offset(f, "drop", target, *offset),
            Gesture::Cancel => write!(f, "cancel"),
        }
    }
}

fn write_with_offset(
    f: &mut fmt::Formatter<'_>,
    verb: &str,
    target: &Target,
    offset: Option<f32>,
) -> fmt::Result {
    match offset {
        Some(o) => write!(f, "{} {} {}", verb, target, o),
        None => write!(f, "{} {}", verb, target),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// Parse a gesture script: one gesture per line, `#` starts a comment.
///
/// ```text
/// start B
/// over C 0.75
/// leave C
/// over @A
/// drop @A
/// cancel
/// ```
///
/// `@root` names the root list and `@<id>` the child list of `<id>`.
pub fn parse_gestures(src: &str) -> Result<Vec<Gesture>, ParseError> {
    let mut gestures = Vec::new();
    for (idx, raw) in src.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let err = |message: String| ParseError {
            line: idx + 1,
            message,
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        let gesture = match words.as_slice() {
            ["start", item] => Gesture::Start {
                item: item.to_string(),
            },
            ["over", target] => Gesture::Over {
                target: parse_target(target),
                offset: None,
            },
            ["over", target, offset] => Gesture::Over {
                target: parse_target(target),
                offset: Some(parse_offset(offset).map_err(err)?),
            },
            ["leave", target] => Gesture::Leave {
                target: parse_target(target),
            },
            ["drop", target] => Gesture::Drop {
                target: parse_target(target),
                offset: None,
            },
            ["drop", target, offset] => Gesture::Drop {
                target: parse_target(target),
                offset: Some(parse_offset(offset).map_err(err)?),
            },
            ["cancel"] => Gesture::Cancel,
            [verb @ ("start" | "over" | "leave" | "drop" | "cancel"), ..] => {
                return Err(err(format!("wrong number of arguments for '{}'", verb)));
            }
            [verb, ..] => return Err(err(format!("unknown gesture '{}'", verb))),
            [] => continue,
        };
        gestures.push(gesture);
    }
    Ok(gestures)
}

/// Parse a single target token.
pub fn parse_target(token: &str) -> Target {
    match token.strip_prefix('@') {
        Some("root") => Target::root(),
        Some(id) => Target::container(id),
        None => Target::item(token),
    }
}

fn parse_offset(token: &str) -> Result<f32, String> {
    let value: f32 = token
        .parse()
        .map_err(|_| format!("invalid offset '{}'", token))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("offset {} outside 0.0..=1.0", value));
    }
    Ok(value)
}
