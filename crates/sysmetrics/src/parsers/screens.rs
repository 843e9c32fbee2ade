//! Parser for `xrandr` output.

use serde::Serialize;

/// One currently-connected output with its active mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Screen {
    #[serde(rename = "Resolution")]
    pub resolution: String,
    #[serde(rename = "Frequency")]
    pub frequency: String,
}

/// Extract the active mode of each connected output.
///
/// Output headers sit at column zero (`eDP-1 connected primary ...`); mode
/// lines are indented and mark the active refresh rate with `*`:
/// ```text
///    1920x1080     59.93*+  54.97
/// ```
/// The refresh rate is normalized to one decimal.
pub fn parse_xrandr(output: &str) -> Vec<Screen> {
    let mut screens = Vec::new();
    let mut in_connected = false;
    for line in output.lines() {
        if !line.starts_with(char::is_whitespace) {
            let mut tokens = line.split_whitespace();
            let _name = tokens.next();
            in_connected = tokens.next() == Some("connected");
            continue;
        }
        if !in_connected {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let Some(resolution) = tokens.next() else {
            continue;
        };
        if !looks_like_mode(resolution) {
            continue;
        }
        let Some(starred) = tokens.find(|token| token.contains('*')) else {
            continue;
        };
        let Ok(refresh) = starred.trim_matches(['*', '+']).parse::<f64>() else {
            continue;
        };
        screens.push(Screen {
            resolution: resolution.to_string(),
            frequency: format!("{refresh:.1}"),
        });
    }
    screens
}

/// A mode token is `<digits>x<digits>`.
fn looks_like_mode(token: &str) -> bool {
    token.split_once('x').is_some_and(|(w, h)| {
        !w.is_empty()
            && !h.is_empty()
            && w.chars().all(|c| c.is_ascii_digit())
            && h.chars().all(|c| c.is_ascii_digit())
    })
}
