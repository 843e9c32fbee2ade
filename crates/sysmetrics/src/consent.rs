//! Consent gate: what actually gets posted, and the interactive prompt.

use std::io::{BufRead, BufReader, Read, Write};

use crate::error::{Error, Result};
use crate::report::OPT_OUT_JSON;

/// How consent is obtained for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentMode {
    /// Send the assembled document as-is.
    Auto,
    /// Send the opt-out marker, whatever was assembled.
    OptOut,
    /// Show the document and ask on stdin.
    Interactive,
}

/// Printed after the pretty document. The trailing bracket doubles as a
/// flush point for pipe-driven readers.
pub const PROMPT: &str = "Do you agree to report this? [y (send)/n (don't send)/q (quit)] ";

#[derive(Debug, PartialEq, Eq)]
enum Answer {
    Accept,
    Decline,
    Abort,
    Unknown,
}

/// Resolve the payload to post for `document` under `mode`.
///
/// Interactive mode owns stdin/stdout for the duration of the prompt loop;
/// quitting (or closing stdin) surfaces [`Error::AbortedByUser`], which
/// callers treat as a clean exit.
pub fn resolve<R: Read, W: Write>(
    mode: ConsentMode,
    document: &str,
    stdin: R,
    stdout: &mut W,
) -> Result<String> {
    match mode {
        ConsentMode::Auto => Ok(document.to_string()),
        ConsentMode::OptOut => Ok(OPT_OUT_JSON.to_string()),
        ConsentMode::Interactive => interactive(document, stdin, stdout),
    }
}

fn interactive<R: Read, W: Write>(document: &str, stdin: R, stdout: &mut W) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(document)?;
    writeln!(stdout, "{}", serde_json::to_string_pretty(&value)?)?;

    let mut reader = BufReader::new(stdin);
    loop {
        write!(stdout, "{PROMPT}")?;
        stdout.flush()?;
        let Some(answer) = next_answer(&mut reader)? else {
            return Err(Error::AbortedByUser);
        };
        match classify(&answer) {
            Answer::Accept => return Ok(document.to_string()),
            Answer::Decline => return Ok(OPT_OUT_JSON.to_string()),
            Answer::Abort => return Err(Error::AbortedByUser),
            Answer::Unknown => continue,
        }
    }
}

/// Read one answer token, terminated by a newline or a closing bracket.
/// `None` means stdin is closed.
fn next_answer<R: BufRead>(reader: &mut R) -> std::io::Result<Option<String>> {
    let mut token = Vec::new();
    loop {
        let mut byte = [0u8; 1];
        if reader.read(&mut byte)? == 0 {
            if token.is_empty() {
                return Ok(None);
            }
            return Ok(Some(normalize(&token)));
        }
        match byte[0] {
            b'\n' | b']' => return Ok(Some(normalize(&token))),
            other => token.push(other),
        }
    }
}

fn normalize(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).trim().to_lowercase()
}

fn classify(answer: &str) -> Answer {
    match answer {
        "y" | "yes" => Answer::Accept,
        "n" | "no" => Answer::Decline,
        "q" | "quit" | "" => Answer::Abort,
        _ => Answer::Unknown,
    }
}
