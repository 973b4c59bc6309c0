use crate::render::{format_event, format_history, format_view, Style};
use anyhow::Context;
use std::io::{BufRead, Write};
use std::time::Instant;
use wretched_core::{EventBus, SaveStore, Session, SessionError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    Roll,
    Draw,
    Apply,
    Tokens(i64),
    Note(String),
    Journal,
    Status,
    History,
    Story,
    NewGame,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Option<PlayCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };
    let command = match cmd.to_ascii_lowercase().as_str() {
        "roll" | "r" => PlayCommand::Roll,
        "draw" | "d" => PlayCommand::Draw,
        "apply" | "a" | "confirm" => PlayCommand::Apply,
        "tokens" | "t" => {
            let delta = rest
                .parse::<i64>()
                .map_err(|_| format!("expected a number like +2 or -1, got '{rest}'"))?;
            PlayCommand::Tokens(delta)
        }
        "note" | "n" => {
            if rest.is_empty() {
                return Err("note needs some text".to_string());
            }
            PlayCommand::Note(rest.to_string())
        }
        "journal" | "j" => PlayCommand::Journal,
        "status" | "s" => PlayCommand::Status,
        "history" | "h" => PlayCommand::History,
        "story" => PlayCommand::Story,
        "new" => PlayCommand::NewGame,
        "help" | "?" => PlayCommand::Help,
        "quit" | "exit" | "q" => PlayCommand::Quit,
        other => return Err(format!("unknown command '{other}' (type 'help')")),
    };
    Ok(Some(command))
}

const HELP: &[(&str, &str)] = &[
    ("roll", "roll the turn die: how many cards this turn"),
    ("draw", "reveal the next card"),
    ("apply", "apply the revealed card's effects"),
    ("tokens +N|-N", "adjust tokens by hand"),
    ("note TEXT", "add a line to your journal"),
    ("journal", "show the journal"),
    ("status", "show resources and the card in play"),
    ("history", "show the last cards applied"),
    ("story", "show the introduction"),
    ("new", "abandon this game and start another"),
    ("quit", "save and leave"),
];

/// The interactive loop. Reads commands until `quit` or end of input; the
/// journal is flushed on every pass once its debounce has elapsed, and
/// unconditionally on the way out.
pub fn run_repl<S, R, W>(
    session: &mut Session<S>,
    story: Option<&str>,
    input: R,
    out: &mut W,
    style: &Style,
) -> anyhow::Result<()>
where
    S: SaveStore,
    R: BufRead,
    W: Write,
{
    let mut events = EventBus::default();
    print_events(session, &mut events, out)?;
    print_status(session, out, style)?;
    writeln!(out, "type 'help' for commands")?;

    for line in input.lines() {
        let line = line.context("read command")?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(out, "{}", style.warning(&msg))?;
                continue;
            }
        };
        if command == PlayCommand::Quit {
            break;
        }
        if let Err(err) = dispatch(session, command, story, &mut events, out, style) {
            let rejected = err.downcast::<SessionError>()?;
            tracing::warn!(target: "wretched::cli", error = %rejected, "command.rejected");
            writeln!(out, "{}", style.warning(&rejected.to_string()))?;
        }
        session
            .flush_journal(Instant::now(), &mut events)
            .context("save journal")?;
        print_events(session, &mut events, out)?;
    }

    session
        .flush_journal_now(&mut events)
        .context("save journal")?;
    print_events(session, &mut events, out)?;
    writeln!(out, "{}", style.info("game saved"))?;
    Ok(())
}

/// Runs one command. Rules and save failures come back as `SessionError`
/// inside the `anyhow` error; anything else is an output failure.
fn dispatch<S: SaveStore, W: Write>(
    session: &mut Session<S>,
    command: PlayCommand,
    story: Option<&str>,
    events: &mut EventBus,
    out: &mut W,
    style: &Style,
) -> anyhow::Result<()> {
    match command {
        PlayCommand::Roll => {
            session.roll_turn(events)?;
            print_events(session, events, out)?;
        }
        PlayCommand::Draw => {
            session.draw(events)?;
            print_events(session, events, out)?;
            write_lines(out, format_view(&session.game().view(), style))?;
        }
        PlayCommand::Apply => {
            session.apply(events)?;
            print_events(session, events, out)?;
            write_lines(out, format_view(&session.game().view(), style))?;
        }
        PlayCommand::Tokens(delta) => {
            session.adjust_tokens(delta, events)?;
        }
        PlayCommand::Note(text) => {
            let mut journal = session.game().journal().to_string();
            if !journal.is_empty() {
                journal.push('\n');
            }
            journal.push_str(&text);
            session.edit_journal(journal, Instant::now());
        }
        PlayCommand::Journal => {
            let journal = session.game().journal();
            if journal.is_empty() {
                write_lines(out, vec!["(the journal is empty)".to_string()])?;
            } else {
                write_lines(out, journal.lines().map(str::to_string).collect())?;
            }
        }
        PlayCommand::Status => write_lines(out, format_view(&session.game().view(), style))?,
        PlayCommand::History => write_lines(out, format_history(&session.game().view()))?,
        PlayCommand::Story => {
            let text = story.unwrap_or("(this game has no introduction)");
            write_lines(out, text.lines().map(str::to_string).collect())?;
        }
        PlayCommand::NewGame => {
            session.new_game(events)?;
            print_events(session, events, out)?;
            write_lines(out, format_view(&session.game().view(), style))?;
        }
        PlayCommand::Help => write_lines(
            out,
            HELP.iter()
                .map(|(cmd, what)| format!("  {cmd:<14} {what}"))
                .collect(),
        )?,
        PlayCommand::Quit => {}
    }
    Ok(())
}

fn print_status<S: SaveStore, W: Write>(
    session: &Session<S>,
    out: &mut W,
    style: &Style,
) -> std::io::Result<()> {
    for line in format_view(&session.game().view(), style) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn print_events<S: SaveStore, W: Write>(
    session: &Session<S>,
    events: &mut EventBus,
    out: &mut W,
) -> std::io::Result<()> {
    let catalog = session.game().catalog();
    for event in events.drain() {
        if let Some(line) = format_event(&event, catalog) {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

fn write_lines<W: Write>(out: &mut W, lines: Vec<String>) -> std::io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use wretched_core::{
        CardCatalog, CardDef, CardId, GameConfig, GameStatus, MemoryStore, RngState, Thresholds,
    };

    fn session(tokens: i64, token_delta: i64) -> Session<MemoryStore> {
        let catalog = CardCatalog::from_entries(CardId::all().map(|id| {
            (
                id,
                CardDef {
                    title: format!("Day {id}"),
                    description: "What happened?".to_string(),
                    token_delta,
                    block_pulls: 0,
                },
            )
        }));
        Session::open(
            GameConfig::with_mechanics(tokens, 10, Thresholds::default()),
            catalog,
            MemoryStore::default(),
            Box::new(RngState::from_seed(17)),
            &mut EventBus::default(),
        )
        .expect("open")
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn play(session: &mut Session<MemoryStore>, script: &str) -> String {
        let mut out = Vec::new();
        run_repl(
            session,
            Some("Once upon a time."),
            Cursor::new(script.to_string()),
            &mut out,
            &Style::plain(),
        )
        .expect("repl");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn parses_commands_and_arguments() {
        assert_eq!(parse_command("  "), Ok(None));
        assert_eq!(parse_command("DRAW"), Ok(Some(PlayCommand::Draw)));
        assert_eq!(parse_command("r"), Ok(Some(PlayCommand::Roll)));
        assert_eq!(parse_command("tokens +3"), Ok(Some(PlayCommand::Tokens(3))));
        assert_eq!(parse_command("t -2"), Ok(Some(PlayCommand::Tokens(-2))));
        assert_eq!(
            parse_command("note the  wind   howls"),
            Ok(Some(PlayCommand::Note("the  wind   howls".to_string())))
        );
        assert!(parse_command("tokens lots").is_err());
        assert!(parse_command("note").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn draw_apply_cycle_reports_and_saves() {
        let mut session = session(5, -1);
        let output = play(&mut session, "draw\ndraw\napply\nquit\n");
        assert!(output.contains("drew "));
        assert!(output.contains("a card is already waiting to be applied"));
        assert!(output.contains("tokens 5 -> 4"));
        assert_eq!(session.game().history().len(), 1);
        let saved = session.store().load().expect("load").expect("snapshot");
        assert_eq!(saved.tokens, 4);
    }

    #[test]
    fn notes_are_saved_on_quit() {
        let mut session = session(5, 0);
        let output = play(&mut session, "note first\nnote second\njournal\n");
        assert!(output.contains("first\nsecond"));
        assert!(output.contains("journal saved"));
        let saved = session.store().load().expect("load").expect("snapshot");
        assert_eq!(saved.journal, "first\nsecond");
    }

    #[test]
    fn losing_shows_the_message_and_blocks_draws() {
        let mut session = session(1, -1);
        let output = play(&mut session, "draw\napply\ndraw\nnew\nstatus\n");
        assert!(output.contains("You have nothing left to give."));
        assert!(output.contains("the game is over"));
        assert!(output.contains("new game: 52 cards shuffled"));
        assert_eq!(session.game().status(), GameStatus::Active);
    }

    #[test]
    fn output_failures_are_reported_not_swallowed() {
        let mut session = session(5, 0);
        let mut events = EventBus::default();
        let err = dispatch(
            &mut session,
            PlayCommand::Draw,
            None,
            &mut events,
            &mut BrokenPipe,
            &Style::plain(),
        )
        .expect_err("closed output");
        assert!(err.downcast_ref::<SessionError>().is_none());
        assert!(err.downcast_ref::<std::io::Error>().is_some());

        let result = run_repl(
            &mut session,
            None,
            Cursor::new("status\n".to_string()),
            &mut BrokenPipe,
            &Style::plain(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn rejected_actions_become_warnings() {
        let mut session = session(5, 0);
        let output = play(&mut session, "apply\nroll\nroll\n");
        assert!(output.contains("no card is waiting to be applied"));
        assert!(output.contains("turn 1: rolled"));
        assert!(output.contains("the turn still has"));
    }

    #[test]
    fn story_and_help_print() {
        let mut session = session(3, 0);
        let output = play(&mut session, "story\nhelp\n");
        assert!(output.contains("Once upon a time."));
        assert!(output.contains("abandon this game"));
    }
}
