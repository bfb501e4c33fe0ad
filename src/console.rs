//! Line-oriented console control surface

use crate::control::Intent;
use ledremote_shared::{ConnectionState, Effect, Preset, ValidationError};

/// One line typed at the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Intent(Intent),
    Connect,
    Status,
    Help,
    Quit,
    Blank,
}

pub fn parse_line(line: &str) -> Result<ConsoleInput, ValidationError> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" => Ok(ConsoleInput::Blank),
        "connect" | "reconnect" => Ok(ConsoleInput::Connect),
        "status" => Ok(ConsoleInput::Status),
        "help" | "?" => Ok(ConsoleInput::Help),
        "quit" | "exit" => Ok(ConsoleInput::Quit),
        _ => line.parse().map(ConsoleInput::Intent),
    }
}

/// `Status: ...` line shown for a connection state
pub fn status_line(state: &ConnectionState) -> String {
    match state {
        ConnectionState::Failed(reason) => format!("Status: Connection failed - {}", reason),
        other => format!("Status: {}", other),
    }
}

pub fn help_text() -> String {
    let presets: Vec<&str> = Preset::ALL.iter().map(|p| p.name()).collect();
    let effects: Vec<&str> = Effect::ALL.iter().map(|e| e.wire_name()).collect();
    format!(
        "Commands:\n\
         \x20 on | off | dynamic\n\
         \x20 brightness up|down|<0-100>\n\
         \x20 speed up|down|<0-100>\n\
         \x20 color <#RRGGBB>\n\
         \x20 preset <{}>\n\
         \x20 effect <{}>\n\
         \x20 connect | status | help | quit",
        presets.join("|"),
        effects.join("|"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledremote_shared::Direction;

    #[test]
    fn test_parse_console_commands() {
        assert_eq!(parse_line("  "), Ok(ConsoleInput::Blank));
        assert_eq!(parse_line("Connect"), Ok(ConsoleInput::Connect));
        assert_eq!(parse_line("exit"), Ok(ConsoleInput::Quit));
        assert_eq!(
            parse_line("brightness +"),
            Ok(ConsoleInput::Intent(Intent::Brightness(Direction::Up)))
        );
        assert!(parse_line("brightness").is_err());
    }

    #[test]
    fn test_status_lines() {
        assert_eq!(status_line(&ConnectionState::Connected), "Status: Connected");
        assert_eq!(
            status_line(&ConnectionState::Failed("refused".into())),
            "Status: Connection failed - refused"
        );
    }

    #[test]
    fn test_help_lists_presets_and_effects() {
        let help = help_text();
        assert!(help.contains("Teal blue"));
        assert!(help.contains("RAINBOW|PROGRESS"));
    }
}
