//! Typed commands understood by the LED device
//!
//! Every numeric field is range-checked when the value is constructed, so a
//! `Command` that exists is always encodable.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while turning user input into a command value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is empty")]
    Empty { field: &'static str },

    #[error("{field} is not a valid value: {input:?}")]
    Malformed { field: &'static str, input: String },

    #[error("{field} out of range: {value} (allowed {min}-{max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("Unknown effect: {0:?}")]
    UnknownEffect(String),

    #[error("Unknown preset color: {0:?}")]
    UnknownPreset(String),

    #[error("Unknown direction: {0:?} (expected up or down)")]
    UnknownDirection(String),
}

/// Step direction for relative brightness and transition speed changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn as_wire(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
        }
    }
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "up" | "+" => Ok(Direction::Up),
            "down" | "-" => Ok(Direction::Down),
            _ => Err(ValidationError::UnknownDirection(input.trim().to_string())),
        }
    }
}

/// Built-in animated effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Rainbow,
    Progress,
}

impl Effect {
    pub const ALL: [Effect; 2] = [Effect::Rainbow, Effect::Progress];

    /// Name as the device expects it (case-sensitive)
    pub fn wire_name(self) -> &'static str {
        match self {
            Effect::Rainbow => "RAINBOW",
            Effect::Progress => "PROGRESS",
        }
    }
}

impl FromStr for Effect {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let name = input.trim();
        Effect::ALL
            .into_iter()
            .find(|effect| effect.wire_name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ValidationError::UnknownEffect(name.to_string()))
    }
}

/// Percentage value in the inclusive range 0-100
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Level(u8);

impl Level {
    pub const MIN: i64 = 0;
    pub const MAX: i64 = 100;

    /// Validate a numeric level
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        Self::checked("level", value)
    }

    /// Validate a level, naming the field it belongs to in errors
    pub fn checked(field: &'static str, value: i64) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field,
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Level(value as u8))
    }

    /// Parse a level typed by a user, naming the field it belongs to in
    /// errors; blank input is rejected, not defaulted
    pub fn parse_field(field: &'static str, input: &str) -> Result<Self, ValidationError> {
        let value = parse_integer(field, input)?;
        Self::checked(field, value)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a plain decimal integer, optionally signed
fn parse_integer(field: &'static str, input: &str) -> Result<i64, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::Malformed {
            field,
            input: trimmed.to_string(),
        });
    }

    // Anything that overflows i64 is out of range for every field we have
    trimmed.parse::<i64>().or(Err(ValidationError::OutOfRange {
        field,
        value: if trimmed.starts_with('-') { i64::MIN } else { i64::MAX },
        min: Level::MIN,
        max: Level::MAX,
    }))
}

/// RGB color triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from unchecked channel values, each 0-255
    pub fn from_channels(r: i64, g: i64, b: i64) -> Result<Self, ValidationError> {
        Ok(Self {
            r: channel("red", r)?,
            g: channel("green", g)?,
            b: channel("blue", b)?,
        })
    }
}

fn channel(field: &'static str, value: i64) -> Result<u8, ValidationError> {
    u8::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field,
        value,
        min: 0,
        max: 255,
    })
}

/// Accepts `#RRGGBB`, `0xRRGGBB` or `RRGGBB`, in any letter case
impl FromStr for Rgb {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "color" });
        }

        let hex = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let malformed = || ValidationError::Malformed {
            field: "color",
            input: trimmed.to_string(),
        };

        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(malformed());
        }

        let value = u32::from_str_radix(hex, 16).map_err(|_| malformed())?;
        Ok(Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        })
    }
}

/// Upper-case hex with the device's `0x` prefix, e.g. `0xFF7F00`
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Named colors offered by the remote's preset palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Red,
    Green,
    Blue,
    White,
    Scarlet,
    Violet,
    Amber,
    TealBlue,
    Pink,
}

impl Preset {
    pub const ALL: [Preset; 9] = [
        Preset::Red,
        Preset::Green,
        Preset::Blue,
        Preset::White,
        Preset::Scarlet,
        Preset::Violet,
        Preset::Amber,
        Preset::TealBlue,
        Preset::Pink,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Red => "Red",
            Preset::Green => "Green",
            Preset::Blue => "Blue",
            Preset::White => "White",
            Preset::Scarlet => "Scarlet",
            Preset::Violet => "Violet",
            Preset::Amber => "Amber",
            Preset::TealBlue => "Teal blue",
            Preset::Pink => "Pink",
        }
    }

    pub fn rgb(self) -> Rgb {
        match self {
            Preset::Red => Rgb::new(0xFF, 0x00, 0x00),
            Preset::Green => Rgb::new(0x00, 0xFF, 0x00),
            Preset::Blue => Rgb::new(0x00, 0x00, 0xFF),
            Preset::White => Rgb::new(0xFF, 0xFF, 0xFF),
            Preset::Scarlet => Rgb::new(0xFF, 0x10, 0x00),
            Preset::Violet => Rgb::new(0x45, 0x00, 0x9F),
            Preset::Amber => Rgb::new(0xFF, 0x7F, 0x00),
            Preset::TealBlue => Rgb::new(0x00, 0x79, 0x9E),
            Preset::Pink => Rgb::new(0xD6, 0x00, 0x82),
        }
    }
}

impl FromStr for Preset {
    type Err = ValidationError;

    /// Names match ignoring case, spaces, dashes and underscores ("teal-blue")
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalize = |s: &str| -> String {
            s.chars()
                .filter(|c| !matches!(c, ' ' | '-' | '_'))
                .map(|c| c.to_ascii_lowercase())
                .collect()
        };
        let wanted = normalize(input);
        Preset::ALL
            .into_iter()
            .find(|preset| normalize(preset.name()) == wanted)
            .ok_or_else(|| ValidationError::UnknownPreset(input.trim().to_string()))
    }
}

/// A single validated instruction for the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PowerOn,
    PowerOff,
    BrightnessDelta(Direction),
    BrightnessSet(Level),
    StaticColor(Rgb),
    EffectStart(Effect),
    TransitionSpeedDelta(Direction),
    TransitionSpeedSet(Level),
}

/// Wire text of the command
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // The device has no dedicated "on" marker; starting the dynamic
            // animation is how it is switched on.
            Command::PowerOn => f.write_str("DYNAMIC"),
            Command::PowerOff => f.write_str("CLEAR"),
            Command::BrightnessDelta(dir) => write!(f, "BRIGHTNESS:{}", dir.as_wire()),
            Command::BrightnessSet(level) => write!(f, "BRIGHTNESS:{}", level),
            Command::StaticColor(rgb) => write!(f, "STATIC:{}", rgb),
            Command::EffectStart(effect) => write!(f, "EFFECT:{}", effect.wire_name()),
            Command::TransitionSpeedDelta(dir) => write!(f, "TSPEED:{}", dir.as_wire()),
            Command::TransitionSpeedSet(level) => write!(f, "TSPEED:{}", level),
        }
    }
}
