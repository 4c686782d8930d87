//! Operator confirmation for reassignments.

use std::io::{self, BufRead, Write};

use fleet_app::guard::{Confirm, Prompt};

/// Asks on stderr and reads the answer from stdin. Anything other than
/// `s`/`si`/`sí`/`y`/`yes` declines.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &Prompt) -> bool {
        let mut stderr = io::stderr().lock();
        let asked = writeln!(stderr, "{}", prompt.title)
            .and_then(|()| write!(stderr, "{} [s/N] ", prompt.message))
            .and_then(|()| stderr.flush());
        if asked.is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

/// Accepts every prompt (`--yes`).
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&mut self, prompt: &Prompt) -> bool {
        tracing::info!("Auto-confirmed: {}", prompt.title);
        true
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    )
}
