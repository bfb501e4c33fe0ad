//! User intents and their conversion into validated commands

use ledremote_shared::{Command, Direction, Effect, Level, Preset, Rgb, ValidationError};
use std::str::FromStr;

/// One request from the control surface, with numbers still unchecked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    PowerOn,
    PowerOff,
    Brightness(Direction),
    SetBrightness(i64),
    StaticColor { r: i64, g: i64, b: i64 },
    Preset(Preset),
    Effect(Effect),
    TransitionSpeed(Direction),
    SetTransitionSpeed(i64),
}

impl TryFrom<Intent> for Command {
    type Error = ValidationError;

    fn try_from(intent: Intent) -> Result<Self, Self::Error> {
        let command = match intent {
            Intent::PowerOn => Command::PowerOn,
            Intent::PowerOff => Command::PowerOff,
            Intent::Brightness(dir) => Command::BrightnessDelta(dir),
            Intent::SetBrightness(value) => {
                Command::BrightnessSet(Level::checked("brightness", value)?)
            }
            Intent::StaticColor { r, g, b } => Command::StaticColor(Rgb::from_channels(r, g, b)?),
            Intent::Preset(preset) => Command::StaticColor(preset.rgb()),
            Intent::Effect(effect) => Command::EffectStart(effect),
            Intent::TransitionSpeed(dir) => Command::TransitionSpeedDelta(dir),
            Intent::SetTransitionSpeed(value) => {
                Command::TransitionSpeedSet(Level::checked("transition speed", value)?)
            }
        };
        Ok(command)
    }
}

/// Parses a console line such as `brightness 40`, `color #FF7F00`,
/// `preset teal blue`, `effect rainbow` or `speed down`.
impl FromStr for Intent {
    type Err = ValidationError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "on" | "dynamic" => Ok(Intent::PowerOn),
            "off" | "clear" => Ok(Intent::PowerOff),
            "brightness" | "b" => step_or_level("brightness", arg)
                .map(|v| v.either(Intent::Brightness, Intent::SetBrightness)),
            "speed" | "tspeed" => step_or_level("transition speed", arg)
                .map(|v| v.either(Intent::TransitionSpeed, Intent::SetTransitionSpeed)),
            "color" | "static" => {
                let rgb: Rgb = arg.parse()?;
                Ok(Intent::StaticColor {
                    r: rgb.r.into(),
                    g: rgb.g.into(),
                    b: rgb.b.into(),
                })
            }
            "preset" => {
                if arg.is_empty() {
                    return Err(ValidationError::Empty { field: "preset" });
                }
                arg.parse().map(Intent::Preset)
            }
            "effect" => {
                if arg.is_empty() {
                    return Err(ValidationError::Empty { field: "effect" });
                }
                arg.parse().map(Intent::Effect)
            }
            "" => Err(ValidationError::Empty { field: "command" }),
            _ => Err(ValidationError::Malformed {
                field: "command",
                input: line.to_string(),
            }),
        }
    }
}

enum StepOrLevel {
    Step(Direction),
    Level(i64),
}

impl StepOrLevel {
    fn either(self, step: fn(Direction) -> Intent, level: fn(i64) -> Intent) -> Intent {
        match self {
            StepOrLevel::Step(dir) => step(dir),
            StepOrLevel::Level(value) => level(value),
        }
    }
}

fn step_or_level(field: &'static str, arg: &str) -> Result<StepOrLevel, ValidationError> {
    if let Ok(dir) = arg.parse::<Direction>() {
        return Ok(StepOrLevel::Step(dir));
    }
    let level = Level::parse_field(field, arg)?;
    Ok(StepOrLevel::Level(level.value().into()))
}
