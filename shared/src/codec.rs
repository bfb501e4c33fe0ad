//! Text codec for the LED device protocol
//!
//! Commands are sent as bare UTF-8 text, one command per write:
//! ```text
//! DYNAMIC | CLEAR | BRIGHTNESS:<UP|DOWN|0-100> | STATIC:0xRRGGBB
//! EFFECT:<RAINBOW|PROGRESS> | TSPEED:<UP|DOWN|0-100>
//! ```
//!
//! The protocol is send-only: the device never answers a command, so there
//! is nothing to decode.

use bytes::Bytes;

use crate::Command;

/// Encode a command into the exact bytes the device expects
pub fn encode(command: &Command) -> Bytes {
    Bytes::from(command.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, Effect, Level, Preset, Rgb};

    fn text(command: Command) -> String {
        String::from_utf8(encode(&command).to_vec()).unwrap()
    }

    #[test]
    fn test_power_commands() {
        assert_eq!(text(Command::PowerOn), "DYNAMIC");
        assert_eq!(text(Command::PowerOff), "CLEAR");
    }

    #[test]
    fn test_brightness_commands() {
        assert_eq!(text(Command::BrightnessDelta(Direction::Up)), "BRIGHTNESS:UP");
        assert_eq!(text(Command::BrightnessDelta(Direction::Down)), "BRIGHTNESS:DOWN");
        assert_eq!(text(Command::BrightnessSet(Level::new(0).unwrap())), "BRIGHTNESS:0");
        assert_eq!(
            text(Command::BrightnessSet(Level::new(100).unwrap())),
            "BRIGHTNESS:100"
        );
    }

    #[test]
    fn test_static_color() {
        assert_eq!(text(Command::StaticColor(Rgb::new(255, 0, 0))), "STATIC:0xFF0000");
        assert_eq!(text(Command::StaticColor(Rgb::new(0, 0, 255))), "STATIC:0x0000FF");
        assert_eq!(text(Command::StaticColor(Preset::Violet.rgb())), "STATIC:0x45009F");
    }

    #[test]
    fn test_effects() {
        assert_eq!(text(Command::EffectStart(Effect::Rainbow)), "EFFECT:RAINBOW");
        assert_eq!(text(Command::EffectStart(Effect::Progress)), "EFFECT:PROGRESS");
    }

    #[test]
    fn test_transition_speed() {
        assert_eq!(text(Command::TransitionSpeedDelta(Direction::Up)), "TSPEED:UP");
        assert_eq!(text(Command::TransitionSpeedDelta(Direction::Down)), "TSPEED:DOWN");
        assert_eq!(text(Command::TransitionSpeedSet(Level::new(7).unwrap())), "TSPEED:7");
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let command = Command::StaticColor(Rgb::new(0x12, 0xab, 0x00));
        assert_eq!(encode(&command), encode(&command));
    }

    #[test]
    fn test_no_trailing_delimiter() {
        let encoded = encode(&Command::PowerOff);
        assert!(!encoded.ends_with(b"\n"));
        assert_eq!(encoded.len(), "CLEAR".len());
    }
}
