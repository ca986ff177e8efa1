use std::borrow::Cow;

use clap::Args;
use pomotick_core::timer::{Category, CustomDuration, Preset, SessionCommand, TimerEngine, TimerSession};
use pomotick_core::Config;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::terminal::{TerminalBell, TerminalDisplay};

const HELP: &str = "commands: start | pause | reset | mode <pomodoro|short|long> | work | rest | \
custom <minutes> <0|30> | status | help | quit";

#[derive(Args)]
pub struct RunArgs {
    /// Initial preset: pomodoro, short or long
    #[arg(long, default_value = "pomodoro")]
    mode: String,
    /// Initial custom duration as MM:SS (seconds 00 or 30)
    #[arg(long)]
    custom: Option<String>,
    /// Start the countdown right away
    #[arg(long)]
    start: bool,
    /// Seed for message selection (overrides messages.seed)
    #[arg(long)]
    seed: Option<u64>,
}

/// One line of interactive input.
#[derive(Debug)]
enum Input {
    Command(SessionCommand),
    Status,
    Help,
    Quit,
    Empty,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Input::Empty);
    };
    let rest: Vec<&str> = words.collect();
    let input = match (verb.to_ascii_lowercase().as_str(), rest.as_slice()) {
        ("start" | "s", []) => Input::Command(SessionCommand::Start),
        ("pause" | "p", []) => Input::Command(SessionCommand::Pause),
        ("reset", []) => Input::Command(SessionCommand::Reset),
        ("work", []) => Input::Command(SessionCommand::SetCategory(Category::Work)),
        ("rest", []) => Input::Command(SessionCommand::SetCategory(Category::Rest)),
        ("mode", [preset]) => {
            let preset: Preset = preset.parse().map_err(|e| format!("{e}"))?;
            Input::Command(SessionCommand::SetMode(preset))
        }
        ("custom", [value]) => {
            let (minutes, seconds) = value.split_once(':').unwrap_or((*value, "0"));
            custom_command(minutes, seconds)?
        }
        ("custom", [minutes, seconds]) => custom_command(minutes, seconds)?,
        ("status", []) => Input::Status,
        ("help" | "?", []) => Input::Help,
        ("quit" | "exit" | "q", []) => Input::Quit,
        _ => return Err(format!("unrecognized input '{}'; {HELP}", line.trim())),
    };
    Ok(input)
}

// Undecodable bytes become U+FFFD and then fail command parsing.
fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

// Range checks belong to the engine; only the number syntax is checked here.
fn custom_command(minutes: &str, seconds: &str) -> Result<Input, String> {
    let parse = |field: &str| {
        field
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("'{field}' is not a whole number"))
    };
    Ok(Input::Command(SessionCommand::SetCustomDuration {
        minutes: parse(minutes)?,
        seconds: parse(seconds)?,
    }))
}

fn initial_engine(args: &RunArgs) -> Result<TimerEngine, Box<dyn std::error::Error>> {
    let preset: Preset = args.mode.parse()?;
    let mut engine = TimerEngine::with_mode(preset.into());
    if let Some(custom) = &args.custom {
        let duration: CustomDuration = custom.parse()?;
        engine.set_custom_duration(duration.minutes(), duration.seconds())?;
    }
    Ok(engine)
}

pub fn run(args: RunArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let engine = initial_engine(&args)?;
    let mut settings = config.session_settings();
    if args.seed.is_some() {
        settings.message_seed = args.seed;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let display = TerminalDisplay::new(config.display.default_title.clone());
    let session = TimerSession::new(engine, display, TerminalBell, settings);
    let result = runtime.block_on(drive(session, args.start));
    // Stdin reads cannot be cancelled; don't wait for the blocked reader.
    runtime.shutdown_background();
    result
}

async fn drive(
    session: TimerSession<TerminalDisplay, TerminalBell>,
    autostart: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel(16);
    let task = tokio::spawn(session.run(rx));
    info!("timer session started");

    if autostart {
        tx.send(SessionCommand::Start).await?;
    }

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if stdin.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = decode_line(&buf);
        match parse_input(&line) {
            Ok(Input::Command(command)) => tx.send(command).await?,
            Ok(Input::Status) => {
                let (reply_tx, reply_rx) = oneshot::channel();
                tx.send(SessionCommand::Status(reply_tx)).await?;
                let snapshot = reply_rx.await?;
                println!("{}", serde_json::to_string(&snapshot)?);
            }
            Ok(Input::Help) => eprintln!("{HELP}"),
            Ok(Input::Quit) => break,
            Ok(Input::Empty) => {}
            Err(message) => eprintln!("{message}"),
        }
    }

    debug!("input closed, shutting session down");
    tx.send(SessionCommand::Shutdown).await?;
    let session = task.await?;
    let snapshot = session.engine().snapshot();
    debug!(?snapshot, "final state");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(line: &str) -> SessionCommand {
        match parse_input(line) {
            Ok(Input::Command(command)) => command,
            other => panic!("Expected command for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn parses_simple_verbs() {
        assert!(matches!(command("start"), SessionCommand::Start));
        assert!(matches!(command("  PAUSE "), SessionCommand::Pause));
        assert!(matches!(command("reset"), SessionCommand::Reset));
        assert!(matches!(
            command("rest"),
            SessionCommand::SetCategory(Category::Rest)
        ));
    }

    #[test]
    fn parses_mode_presets() {
        assert!(matches!(
            command("mode long"),
            SessionCommand::SetMode(Preset::LongBreak)
        ));
        assert!(parse_input("mode nap").is_err());
    }

    #[test]
    fn custom_forms_are_equivalent() {
        for line in ["custom 10 30", "custom 10:30"] {
            match command(line) {
                SessionCommand::SetCustomDuration { minutes, seconds } => {
                    assert_eq!((minutes, seconds), (10, 30));
                }
                other => panic!("Expected SetCustomDuration, got {other:?}"),
            }
        }
    }

    #[test]
    fn out_of_range_custom_is_left_to_the_engine() {
        assert!(matches!(
            command("custom 90 15"),
            SessionCommand::SetCustomDuration {
                minutes: 90,
                seconds: 15
            }
        ));
        assert!(parse_input("custom ten 0").is_err());
    }

    #[test]
    fn invalid_utf8_is_reported_not_fatal() {
        let line = decode_line(b"st\xffart\n");
        assert!(parse_input(&line).is_err());
        assert!(matches!(
            parse_input(&decode_line(b"pause\r\n")),
            Ok(Input::Command(SessionCommand::Pause))
        ));
    }

    #[test]
    fn blank_and_control_lines() {
        assert!(matches!(parse_input("   "), Ok(Input::Empty)));
        assert!(matches!(parse_input("status"), Ok(Input::Status)));
        assert!(matches!(parse_input("q"), Ok(Input::Quit)));
        assert!(parse_input("start now").is_err());
    }

    #[test]
    fn initial_engine_honours_custom_flag() {
        let args = RunArgs {
            mode: "short".into(),
            custom: Some("12:30".into()),
            start: false,
            seed: None,
        };
        let engine = initial_engine(&args).unwrap();
        assert_eq!(engine.remaining_secs(), 750);
        assert_eq!(engine.category(), Category::Rest);
    }
}
