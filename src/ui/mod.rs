//! User-facing notification and confirmation boundary.
//!
//! The browser original used `alert`/`confirm` dialogs and an inline status
//! element; these traits are the injectable equivalent, so the controller
//! never talks to the terminal directly and tests can observe every message.

use std::io::{BufRead, Write};

/// Notification surface. `alert` is the modal-equivalent channel for errors
/// and confirmations; `status` drives the inline status line (an empty
/// string clears it).
pub trait Notify: Send + Sync {
    fn alert(&self, message: &str);
    fn status(&self, message: &str);
}

/// Synchronous yes/no confirmation.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
}

/// Console notifier for the CLI front-end.
pub struct ConsoleNotifier;

impl Notify for ConsoleNotifier {
    fn alert(&self, message: &str) {
        println!("[!] {}", message);
    }

    fn status(&self, message: &str) {
        if message.is_empty() {
            return;
        }
        println!("{}", message);
    }
}

/// Reads the answer from stdin ("s"/"sim" confirms, anything else declines).
pub struct StdinConfirm;

impl ConfirmPrompt for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        print!("{} [s/N] ", question);
        std::io::stdout().flush().ok();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }

        matches!(
            answer.trim().to_lowercase().as_str(),
            "s" | "sim" | "y" | "yes"
        )
    }
}
