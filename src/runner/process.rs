//! Child process execution with live, line-buffered output

use super::{OutputCallback, OutputLevel, PlannedCommand};
use crate::error::{Error, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

/// Forwards output lines to the callback and optionally to this process
#[derive(Clone, Default)]
pub(super) struct OutputSink {
    pub callback: Option<OutputCallback>,
    pub echo: bool,
}

impl OutputSink {
    pub fn emit(&self, line: &str, level: OutputLevel) {
        if self.echo {
            match level {
                OutputLevel::Error => eprintln!("{line}"),
                OutputLevel::Info | OutputLevel::Success => println!("{line}"),
            }
        }
        if let Some(callback) = &self.callback {
            callback(line, level);
        }
    }
}

/// Run `command` in `workdir` with stdin inherited, returning captured
/// stdout followed by stderr.
pub(super) async fn run(command: &PlannedCommand, workdir: &Path, sink: &OutputSink) -> Result<String> {
    let rendered = command.to_string();
    debug!(command = %rendered, workdir = %workdir.display(), "Spawning command");

    let mut child = Command::new(&command.program)
        .args(&command.args)
        .current_dir(workdir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| Error::Spawn {
            command: rendered.clone(),
            source,
        })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (out_lines, err_lines, status) = tokio::join!(
        forward(stdout, OutputLevel::Info, sink),
        forward(stderr, OutputLevel::Error, sink),
        child.wait(),
    );

    let status = status.map_err(|source| Error::Spawn {
        command: rendered.clone(),
        source,
    })?;

    let mut captured = out_lines;
    captured.extend(err_lines);
    let output = captured.join("\n");

    if !status.success() {
        warn!(command = %rendered, code = ?status.code(), "Command failed");
        return Err(Error::CommandFailed {
            command: rendered,
            code: status.code(),
            output,
        });
    }

    Ok(output)
}

async fn forward<R>(reader: Option<R>, level: OutputLevel, sink: &OutputSink) -> Vec<String>
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return Vec::new();
    };

    let mut captured = Vec::new();
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(&['\n', '\r'][..]).to_string();
                sink.emit(&line, level);
                captured.push(line);
            }
            Err(err) => {
                debug!(error = %err, "Stopped reading command output");
                break;
            }
        }
    }
    captured
}
