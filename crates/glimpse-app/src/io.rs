use glimpse_types::{AppEvent, Point};
use kanal::AsyncSender;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

pub const COMMAND_HELP: &str = "commands: load <path> | down <x> <y> | move <x> <y> | up <x> <y> | \
leave <x> <y> | cancel | full | lang <tag> | quit";

/// Feed line commands from stdin into the event loop. Always ends by
/// queueing `Shutdown`, unless cancelled or the event loop is already gone.
pub async fn stdin_commands(
    input_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    tracing::info!("{}", COMMAND_HELP);

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line.unwrap_or_else(|e| {
                tracing::warn!("stdin read failed: {}", e);
                None
            }),
        };

        // EOF behaves like quit; the event loop drains what is queued first
        let Some(line) = line else {
            let _ = input_tx.send(AppEvent::Shutdown).await;
            break;
        };

        match parse_command(&line) {
            Ok(Some(event)) => {
                let quit = matches!(event, AppEvent::Shutdown);
                input_tx.send(event).await?;
                if quit {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("{} ({})", e, COMMAND_HELP),
        }
    }

    tracing::info!("stdin reader stopping");
    Ok(())
}

/// Parse one command line; blank lines and `#` comments yield `None`
pub fn parse_command(line: &str) -> Result<Option<AppEvent>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map(|(c, r)| (c, r.trim()))
        .unwrap_or((line, ""));

    let event = match command {
        "load" if !rest.is_empty() => AppEvent::LoadImage(rest.into()),
        "down" => AppEvent::PointerDown(parse_point(rest)?),
        "move" => AppEvent::PointerMove(parse_point(rest)?),
        "up" => AppEvent::PointerUp(parse_point(rest)?),
        "leave" => AppEvent::PointerLeave(parse_point(rest)?),
        "cancel" => AppEvent::CancelSelection,
        "full" => AppEvent::RecognizeFullImage,
        "lang" if !rest.is_empty() => AppEvent::SetLanguage(rest.to_string()),
        "quit" | "exit" => AppEvent::Shutdown,
        _ => return Err(format!("unknown command '{line}'")),
    };

    Ok(Some(event))
}

fn parse_point(args: &str) -> Result<Point, String> {
    let mut parts = args.split_whitespace().map(str::parse::<f64>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(x)), Some(Ok(y)), None) => Ok(Point::new(x, y)),
        _ => Err(format!("expected '<x> <y>', got '{args}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_commands() {
        match parse_command("down 10 20.5") {
            Ok(Some(AppEvent::PointerDown(p))) => assert_eq!(p, Point::new(10.0, 20.5)),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            parse_command("  leave 0 0 "),
            Ok(Some(AppEvent::PointerLeave(_)))
        ));
        assert!(parse_command("up 10").is_err());
        assert!(parse_command("move a b").is_err());
    }

    #[test]
    fn test_other_commands() {
        match parse_command("load /tmp/scan one.png") {
            Ok(Some(AppEvent::LoadImage(path))) => {
                assert_eq!(path.to_str(), Some("/tmp/scan one.png"))
            }
            other => panic!("unexpected: {other:?}"),
        }
        match parse_command("lang jpn+eng") {
            Ok(Some(AppEvent::SetLanguage(tag))) => assert_eq!(tag, "jpn+eng"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(parse_command("full"), Ok(Some(AppEvent::RecognizeFullImage))));
        assert!(matches!(parse_command("quit"), Ok(Some(AppEvent::Shutdown))));
        assert!(matches!(parse_command("# note"), Ok(None)));
        assert!(matches!(parse_command(""), Ok(None)));
        assert!(parse_command("load").is_err());
        assert!(parse_command("zoom 2").is_err());
    }
}
