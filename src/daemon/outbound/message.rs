use std::io::{Error as IoError, ErrorKind as IoErrorKind};
use std::process::Stdio;

use snafu::prelude::*;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::domain::daemon::outbound::{MessagePort, MessageRequest};

const PREAMBLES: &[&str] = &[
    "Sure, here is ",
    "Sure, here's ",
    "Sure! Here is ",
    "Sure! Here's ",
    "Here is ",
    "Here's ",
    "Here you go: ",
    "Here you go! ",
    "Of course! ",
    "Of course, ",
    "Certainly! ",
    "Certainly, ",
];

/// A [`MessagePort`] implementation which asks an external text generator
/// for the reminder text, and falls back to the built-in messages.
///
/// The generator is any command reading a prompt from stdin and writing the
/// message to stdout.
#[derive(Debug, Clone, Default)]
pub struct MessageService {
    command: Vec<String>,
}

impl MessageService {
    /// Creates a new [`MessageService`]. An empty `command` disables
    /// generation.
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    async fn run(&self, input: String) -> Result<String, GenerateMessageError> {
        let (program, args) = self.command.split_first().context(NoCommandSnafu)?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .context(SpawnSnafu { program })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(input.as_bytes()).await {
                Err(err) if err.kind() != IoErrorKind::BrokenPipe => {
                    return Err(err).context(CommunicateSnafu);
                }
                _ => {}
            }
        }

        let output = child.wait_with_output().await.context(CommunicateSnafu)?;
        ensure!(
            output.status.success(),
            ExitSnafu {
                status: output.status.to_string()
            }
        );

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait::async_trait]
impl MessagePort for MessageService {
    async fn generate(&self, request: MessageRequest) -> String {
        let kind = request.kind;
        if !request.generation_enabled || self.command.is_empty() {
            return kind.random_fallback().to_owned();
        }

        match self.run(build_prompt(&request)).await {
            Ok(raw) => match clean(&raw) {
                Some(text) => text,
                None => {
                    tracing::warn!(%kind, "generator produced no text");
                    kind.random_fallback().to_owned()
                }
            },
            Err(err) => {
                tracing::warn!(%kind, err = %snafu::Report::from_error(&err), "message generation failed");
                kind.random_fallback().to_owned()
            }
        }
    }
}

/// The instructions and the prompt written to the generator.
pub fn build_prompt(request: &MessageRequest) -> String {
    let instructions = format!(
        "You are a notification message generator. Output ONLY the notification text itself. \
         Never include preamble like \"Sure\", \"Here is\", \"Here's\", or any conversational filler. \
         Never include quotes, emojis, hashtags, or labels. \
         1-2 sentences max, under 120 characters. Be {}.",
        request.tone.prompt_description()
    );

    let custom = request.prompt.trim();
    let prompt = if custom.is_empty() {
        format!(
            "Write a short notification reminding someone about {}. \
             Be original and vary your phrasing. Output only the reminder text.",
            request.kind.prompt_description()
        )
    } else {
        format!(
            "{custom} The reminder type is: {}. Output only the reminder text.",
            request.kind.prompt_description()
        )
    };

    format!("{instructions}\n\n{prompt}\n")
}

/// Strip a conversational preamble and wrapping quotes from generated text.
/// Returns `None` if nothing is left.
pub fn clean(raw: &str) -> Option<String> {
    let mut text = raw.trim();

    if let Some(rest) = PREAMBLES
        .iter()
        .find_map(|preamble| text.strip_prefix(preamble))
    {
        text = rest;
    }

    if text.len() > 2 {
        if let Some(inner) = text
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            text = inner;
        }
    }

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}

/// An error type of running the generator command.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum GenerateMessageError {
    #[snafu(display("No generator command is configured"))]
    NoCommand,
    #[snafu(display("Could not spawn generator {program}"))]
    Spawn { program: String, source: IoError },
    #[snafu(display("Could not talk to the generator"))]
    Communicate { source: IoError },
    #[snafu(display("Generator exited with {status}"))]
    Exit { status: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::entity::{ReminderKind, Tone};

    fn request(kind: ReminderKind, generation_enabled: bool) -> MessageRequest {
        MessageRequest {
            kind,
            tone: Tone::Humorous,
            prompt: String::new(),
            generation_enabled,
        }
    }

    fn shell(script: &str) -> MessageService {
        MessageService::new(vec!["sh".to_owned(), "-c".to_owned(), script.to_owned()])
    }

    #[test]
    fn clean_strips_preamble_and_quotes() {
        assert_eq!(
            clean("  Sure, here is \"Roll your shoulders back.\"\n"),
            Some("Roll your shoulders back.".to_owned())
        );
        assert_eq!(clean("Of course! Time to stand."), Some("Time to stand.".to_owned()));
        assert_eq!(clean("\"\""), Some("\"\"".to_owned()));
        assert_eq!(clean(" \n "), None);
    }

    #[test]
    fn build_prompt_default_and_custom() {
        let prompt = build_prompt(&request(ReminderKind::Posture, true));
        assert!(prompt.contains(Tone::Humorous.prompt_description()));
        assert!(prompt.contains(ReminderKind::Posture.prompt_description()));
        assert!(prompt.contains("Be original"));

        let mut custom = request(ReminderKind::Break, true);
        custom.prompt = "  Mention coffee.  ".to_owned();
        let prompt = build_prompt(&custom);
        assert!(prompt.contains("Mention coffee. The reminder type is:"));
        assert!(!prompt.contains("Be original"));
    }

    #[tokio::test]
    async fn message_service_disabled_uses_fallback() {
        let service = shell("echo generated");
        let message = service.generate(request(ReminderKind::Break, false)).await;
        assert!(ReminderKind::Break.fallback_messages().contains(&message.as_str()));

        let service = MessageService::default();
        let message = service.generate(request(ReminderKind::Break, true)).await;
        assert!(ReminderKind::Break.fallback_messages().contains(&message.as_str()));
    }

    #[tokio::test]
    async fn message_service_generates() {
        let service = shell("cat > /dev/null; printf '%s' 'Sure, here is \"Roll your shoulders back.\"'");
        let message = service.generate(request(ReminderKind::Posture, true)).await;
        assert_eq!(message, "Roll your shoulders back.");
    }

    #[tokio::test]
    async fn message_service_receives_prompt() {
        let service = shell("cat");
        let message = service.generate(request(ReminderKind::StandSit, true)).await;
        assert!(message.contains(ReminderKind::StandSit.prompt_description()));
    }

    #[tokio::test]
    async fn message_service_falls_back_on_failure() {
        for service in [
            shell("exit 3"),
            shell("cat > /dev/null"),
            MessageService::new(vec!["/nonexistent/breather-generator".to_owned()]),
        ] {
            let message = service.generate(request(ReminderKind::Posture, true)).await;
            assert!(ReminderKind::Posture.fallback_messages().contains(&message.as_str()));
        }
    }
}
