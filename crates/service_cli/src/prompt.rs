//! Interactive prompts for values not given on the command line.

use std::io::{self, BufRead, Write};

use crate::{CliError, Result};

/// Reads answers from `input` after writing questions to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

/// Prompter on the process's stdin and stdout.
pub fn stdio() -> Prompter<io::StdinLock<'static>, io::Stdout> {
    Prompter::new(io::stdin().lock(), io::stdout())
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Creates a prompter.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CliError::InvalidArgument(format!(
                "no answer to \"{}\"",
                question.trim_end_matches([' ', ':'])
            )));
        }
        Ok(line.trim().to_string())
    }

    /// Asks until a non-empty answer is given.
    ///
    /// # Errors
    ///
    /// `CliError::InvalidArgument` if input ends first.
    pub fn ask_string(&mut self, question: &str) -> Result<String> {
        loop {
            let answer = self.read_answer(question)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
        }
    }

    /// Asks until the answer parses as a number.
    ///
    /// # Errors
    ///
    /// `CliError::InvalidArgument` if input ends first.
    pub fn ask_f64(&mut self, question: &str) -> Result<f64> {
        loop {
            let answer = self.read_answer(question)?;
            match answer.parse::<f64>() {
                Ok(value) if value.is_finite() => return Ok(value),
                _ => writeln!(self.output, "Please enter a number, got \"{}\"", answer)?,
            }
        }
    }

    /// Returns `value` if set, otherwise asks.
    pub fn f64_or_ask(&mut self, value: Option<f64>, question: &str) -> Result<f64> {
        match value {
            Some(v) => Ok(v),
            None => self.ask_f64(question),
        }
    }
}
