use std::fs::{self, OpenOptions};
use std::io::{Error as IoError, ErrorKind, Write};
use std::path::{Path, PathBuf};

use snafu::prelude::*;

pub const DEFAULT_CONTENT: &str = r#"# This configuration file is generated automatically. Feel free to edit it and
# run `breather reload` to apply the changes.

[general]
# Play the notification sound with every reminder.
play_sounds = true
# Seconds before a banner reminder disappears.
banner_dismiss_seconds = 8
# Append a short fact below every reminder.
append_fact = false

# One table per reminder: `break`, `posture` and `stand-sit`. `interval` is in
# minutes, from 1 up to 10080 (one week). `display` is one of
# `notification`, `banner` or `fullscreen`. A missing table keeps the built-in
# defaults.
[reminders.break]
enabled = true
interval = 25
display = "notification"

[reminders.posture]
enabled = true
interval = 15
display = "notification"

[reminders.stand-sit]
enabled = false
interval = 30
display = "notification"

# Reminder texts can be produced by a local text generator. The command
# reads the prompt from stdin and writes the message to stdout. Built-in
# messages are used whenever it is disabled or fails.
[generation]
enabled = false
# One of `friendly`, `humorous`, `professional` or `motivational`.
tone = "friendly"
# Replaces the built-in prompt when not empty.
prompt = ""
# command = ["ollama", "run", "llama3.2"]

# Paths to runtime files. Leave them out to use XDG runtime directory.
# [runtime]
# socket = "/path/to/unix/socket"
# pid = "/path/to/pid/file"
"#;

/// Read the whole configuration file. When `create_new` is set, a missing
/// file is first created from [`DEFAULT_CONTENT`].
///
/// # Errors
///
/// This function will return an error if the file doesn't exist and may not
/// be created, or any IO fails.
pub fn read_content(path: &Path, create_new: bool) -> Result<String, ReadContentError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            ensure!(
                create_new,
                NotFoundSnafu {
                    path: path.to_path_buf()
                }
            );
            create_default(path)?;
            tracing::info!(path = %path.display(), "created default configuration");
            Ok(DEFAULT_CONTENT.to_owned())
        }
        Err(err) => Err(err).context(FileSystemSnafu {
            when: "Reading configuration",
        }),
    }
}

fn create_default(path: &Path) -> Result<(), ReadContentError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .context(FileSystemSnafu {
            when: "Creating configuration file",
        })?;

    file.write_all(DEFAULT_CONTENT.as_bytes())
        .context(FileSystemSnafu {
            when: "Writing default configuration content",
        })
}

/// An error type for reading content from the configuration file.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum ReadContentError {
    #[snafu(display("Could not open inexistent file {}", path.display()))]
    NotFound { path: PathBuf },
    #[snafu(display("File system error: {when}"))]
    FileSystem { when: String, source: IoError },
}
