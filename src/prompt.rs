use console::Term;
use std::io::{self, BufRead};

pub fn read_line(prompt: &str) -> io::Result<String> {
    let term = Term::stdout();
    term.write_str(prompt)?;
    let line = if term.is_term() {
        term.read_line()?
    } else {
        read_piped_line()?
    };
    Ok(line.trim().to_string())
}

/// Reads without echoing the typed characters.
pub fn read_secret(prompt: &str) -> io::Result<String> {
    let term = Term::stdout();
    term.write_str(prompt)?;
    if term.is_term() {
        term.read_secure_line()
    } else {
        Ok(read_piped_line()?.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Uses `given` unless it is missing or empty, otherwise asks.
pub fn given_or_ask<F>(given: Option<String>, ask: F) -> io::Result<String>
where
    F: FnOnce() -> io::Result<String>,
{
    match given.filter(|value| !value.is_empty()) {
        Some(value) => Ok(value),
        None => ask(),
    }
}

pub fn confirm(prompt: &str) -> io::Result<bool> {
    Ok(is_affirmative(&read_line(prompt)?))
}

/// Only an explicit `y` confirms; anything else, including an empty answer, declines.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

fn read_piped_line() -> io::Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}
