//! Styling of CLI output.

use std::io::IsTerminal;

use owo_colors::OwoColorize;

pub fn success(text: impl AsRef<str>) -> String {
    let text = text.as_ref();
    if std::io::stdout().is_terminal() {
        format!("{}", text.green())
    } else {
        text.to_string()
    }
}

pub fn error(text: impl AsRef<str>) -> String {
    let text = text.as_ref();
    if std::io::stderr().is_terminal() {
        format!("{}", text.red())
    } else {
        text.to_string()
    }
}
