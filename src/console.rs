use crate::tracking::TrackingEvent;

/// A line typed into the console driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Event(TrackingEvent),
    Status,
    Quit,
}

pub const USAGE: &str = "commands: created <target-id> | deleted | found | lost | cancel | tap | menu on|off | status | quit";

/// Parses one console line. Blank lines and unknown commands yield `None`.
pub fn parse_command(line: &str) -> Option<ConsoleCommand> {
    let mut words = line.split_whitespace();
    let command = words.next()?.to_ascii_lowercase();
    let argument = words.next();

    let event = match (command.as_str(), argument) {
        ("created", Some(target_id)) => TrackingEvent::TargetCreated {
            target_id: target_id.to_string(),
        },
        ("deleted", None) => TrackingEvent::TargetDeleted,
        ("found", None) => TrackingEvent::TrackingFound,
        ("lost", None) => TrackingEvent::TrackingLost,
        ("cancel", None) => TrackingEvent::Cancel,
        ("tap", None) => TrackingEvent::AugmentationTapped,
        ("menu", Some("on")) => TrackingEvent::MenuVisibilityChanged { visible: true },
        ("menu", Some("off")) => TrackingEvent::MenuVisibilityChanged { visible: false },
        ("status", None) => return Some(ConsoleCommand::Status),
        ("quit" | "exit", None) => return Some(ConsoleCommand::Quit),
        _ => return None,
    };

    Some(ConsoleCommand::Event(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_target_creation() {
        assert_eq!(
            parse_command("created  book-7 "),
            Some(ConsoleCommand::Event(TrackingEvent::TargetCreated {
                target_id: "book-7".into()
            }))
        );
    }

    #[test]
    fn parses_menu_toggle_and_control_words() {
        assert_eq!(
            parse_command("MENU on"),
            Some(ConsoleCommand::Event(TrackingEvent::MenuVisibilityChanged { visible: true }))
        );
        assert_eq!(parse_command("status"), Some(ConsoleCommand::Status));
        assert_eq!(parse_command("exit"), Some(ConsoleCommand::Quit));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("created"), None);
        assert_eq!(parse_command("menu sideways"), None);
        assert_eq!(parse_command("lost now"), None);
    }
}
