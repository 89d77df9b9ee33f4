/// Commands accepted inside the interactive research loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    History,
    Status,
    Save { path: Option<String> },
    Help,
}

/// Parse a line of loop input as a slash command. Returns `None` for plain
/// text (a research question) and for unrecognized slash commands; the loop
/// decides what to do with each.
pub fn parse_command(input: &str) -> Option<ReplCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next()?.to_lowercase();
    let args = parts.next().unwrap_or("").trim();

    match cmd.as_str() {
        "/quit" | "/exit" => Some(ReplCommand::Quit),
        "/history" => Some(ReplCommand::History),
        "/status" => Some(ReplCommand::Status),
        "/save" => Some(ReplCommand::Save {
            path: if args.is_empty() {
                None
            } else {
                Some(args.to_string())
            },
        }),
        "/help" | "/?" => Some(ReplCommand::Help),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_command() {
        assert_eq!(parse_command("/quit"), Some(ReplCommand::Quit));
    }

    #[test]
    fn exit_alias() {
        assert_eq!(parse_command("/exit"), Some(ReplCommand::Quit));
    }

    #[test]
    fn quit_case_insensitive() {
        assert_eq!(parse_command("/QUIT"), Some(ReplCommand::Quit));
    }

    #[test]
    fn history_command() {
        assert_eq!(parse_command("/history"), Some(ReplCommand::History));
    }

    #[test]
    fn status_ignores_extra_args() {
        assert_eq!(parse_command("/status extra"), Some(ReplCommand::Status));
    }

    #[test]
    fn save_without_path() {
        assert_eq!(
            parse_command("/save"),
            Some(ReplCommand::Save { path: None })
        );
    }

    #[test]
    fn save_with_path() {
        assert_eq!(
            parse_command("/save notes/draft.txt"),
            Some(ReplCommand::Save {
                path: Some("notes/draft.txt".to_string())
            })
        );
    }

    #[test]
    fn help_command() {
        assert_eq!(parse_command("/help"), Some(ReplCommand::Help));
    }

    #[test]
    fn help_question_mark() {
        assert_eq!(parse_command("/?"), Some(ReplCommand::Help));
    }

    #[test]
    fn plain_text_returns_none() {
        assert_eq!(parse_command("what is quantum computing"), None);
    }

    #[test]
    fn unknown_command_returns_none() {
        assert_eq!(parse_command("/unknown"), None);
    }

    #[test]
    fn empty_input_returns_none() {
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn leading_whitespace_accepted() {
        assert_eq!(parse_command("  /quit"), Some(ReplCommand::Quit));
    }
}
