//! Interactive choices.
//!
//! The resolver and command handlers only see the [`Chooser`] trait, so they
//! can run against a scripted chooser in tests. [`TerminalChooser`] is the
//! implementation used by the binary.

use std::io::{self, BufRead, Write};

/// Ask the user to pick among options or to confirm an action.
pub trait Chooser {
    /// Present `options` under `title` and return the chosen index, or
    /// `None` if the user gave up.
    fn choose(&mut self, title: &str, options: &[String]) -> Option<usize>;

    /// Ask a yes/no question. Anything but an explicit yes is a no.
    fn confirm(&mut self, question: &str) -> bool;
}

/// Chooser reading answers line by line from a reader.
///
/// Blocks until the user answers; there is no timeout.
pub struct TerminalChooser<R, W> {
    input: R,
    output: W,
}

impl TerminalChooser<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr and read from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Read one trimmed line; `None` at end of input or on read error.
    fn read_answer(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl<R: BufRead, W: Write> Chooser for TerminalChooser<R, W> {
    fn choose(&mut self, title: &str, options: &[String]) -> Option<usize> {
        // Prompt output is best effort: a closed stderr must not abort the choice
        let _ = writeln!(self.output, "{title}");
        for (i, option) in options.iter().enumerate() {
            let _ = writeln!(self.output, "{i:>3}  {option}");
        }

        loop {
            let last = options.len().saturating_sub(1);
            let _ = write!(self.output, "Pick a stop [0-{last}] (or q): ");
            let _ = self.output.flush();

            let answer = self.read_answer()?;
            if answer.eq_ignore_ascii_case("q") {
                return None;
            }
            match answer.parse::<usize>() {
                Ok(i) if i < options.len() => return Some(i),
                _ => {
                    let _ = writeln!(self.output, "'{answer}' is not one of the choices");
                }
            }
        }
    }

    fn confirm(&mut self, question: &str) -> bool {
        let _ = write!(self.output, "{question} [y/N]: ");
        let _ = self.output.flush();

        let answer = self.read_answer().unwrap_or_default().to_ascii_lowercase();
        matches!(answer.as_str(), "y" | "yes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chooser(input: &str) -> TerminalChooser<&[u8], Vec<u8>> {
        TerminalChooser::new(input.as_bytes(), Vec::new())
    }

    fn options() -> Vec<String> {
        vec!["Oslo S".to_string(), "Oslo bussterminal".to_string()]
    }

    #[test]
    fn picks_index() {
        let mut c = chooser("1\n");
        assert_eq!(c.choose("Matches", &options()), Some(1));

        let shown = String::from_utf8(c.output).unwrap();
        assert!(shown.contains("  0  Oslo S"));
        assert!(shown.contains("  1  Oslo bussterminal"));
    }

    #[test]
    fn retries_invalid_answers() {
        let mut c = chooser("7\nfoo\n0\n");
        assert_eq!(c.choose("Matches", &options()), Some(0));
    }

    #[test]
    fn q_aborts() {
        assert_eq!(chooser("q\n").choose("Matches", &options()), None);
        assert_eq!(chooser("Q\n").choose("Matches", &options()), None);
    }

    #[test]
    fn end_of_input_aborts() {
        assert_eq!(chooser("").choose("Matches", &options()), None);
    }

    #[test]
    fn confirm_needs_explicit_yes() {
        assert!(chooser("y\n").confirm("Delete?"));
        assert!(chooser("YES\n").confirm("Delete?"));
        assert!(!chooser("\n").confirm("Delete?"));
        assert!(!chooser("n\n").confirm("Delete?"));
        assert!(!chooser("").confirm("Delete?"));
    }
}
