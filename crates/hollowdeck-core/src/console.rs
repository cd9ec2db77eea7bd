//! Input console: classifies operator input and replies evasively.
//!
//! Submitted text is truncated, sorted into emotional / technical / plain,
//! and answered with a short canned acknowledgement. Replies accumulate in
//! a small ring. The console never acts on input; that is the point.

use std::collections::VecDeque;

use lazy_static::lazy_static;
use regex::Regex;

use crate::rng::Mulberry32;

/// Longest input the console will look at.
pub const INPUT_MAX: usize = 80;

/// Retained replies.
pub const REPLY_CAP: usize = 5;

/// Drift bump applied when the console opens.
pub const OPEN_DRIFT_BUMP: f64 = 0.01;

const PLAIN_REPLIES: [&str; 3] = ["input registered", "intent unclear", "signal accepted"];

lazy_static! {
    static ref RE_EMOTIONAL: Regex =
        Regex::new(r"(?i)(!{2,}|😭|😢|❤️|love|hate|sad|angry|tears|grief)").unwrap();
    static ref RE_TECHNICAL: Regex = Regex::new(
        r"(?i)[{}\[\];<>]|=>|function|class|const|let|var|import|export|SELECT|INSERT|HTTP|JSON"
    )
    .unwrap();
    static ref RE_NON_ALNUM: Regex = Regex::new(r"[^a-z0-9\s]").unwrap();
    static ref RE_SPACES: Regex = Regex::new(r"\s+").unwrap();
}

/// How the console disposed of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Blank input, nothing happened.
    Ignored,
    /// Emotional input is swallowed without a reply.
    Swallowed,
    /// Technical input comes back stripped, with a fixed reply.
    Simplified(String),
    /// Everything else draws a canned acknowledgement.
    Acknowledged,
}

pub struct Console {
    rng: Mulberry32,
    replies: VecDeque<String>,
}

impl Console {
    pub fn new(rng: Mulberry32) -> Self {
        Self {
            rng,
            replies: VecDeque::with_capacity(REPLY_CAP),
        }
    }

    /// Clears retained replies, as reopening the overlay does.
    pub fn reset(&mut self) {
        self.replies.clear();
    }

    /// Classify and answer one submission.
    pub fn submit(&mut self, raw: &str) -> Disposition {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Disposition::Ignored;
        }
        let text: String = trimmed.chars().take(INPUT_MAX).collect();

        if RE_EMOTIONAL.is_match(&text) {
            return Disposition::Swallowed;
        }
        if RE_TECHNICAL.is_match(&text) {
            self.push_reply("intent unclear");
            return Disposition::Simplified(simplify(&text));
        }
        let reply = *self.rng.pick(&PLAIN_REPLIES);
        self.push_reply(reply);
        Disposition::Acknowledged
    }

    fn push_reply(&mut self, line: &str) {
        self.replies.push_back(line.to_string());
        while self.replies.len() > REPLY_CAP {
            self.replies.pop_front();
        }
    }

    pub fn replies(&self) -> impl Iterator<Item = &String> {
        self.replies.iter()
    }
}

/// Lowercase, strip punctuation, collapse whitespace.
fn simplify(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = RE_NON_ALNUM.replace_all(&lower, "");
    RE_SPACES.replace_all(&stripped, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console() -> Console {
        Console::new(Mulberry32::new(7))
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut c = console();
        assert_eq!(c.submit("   "), Disposition::Ignored);
        assert_eq!(c.replies().count(), 0);
    }

    #[test]
    fn emotional_input_gets_no_reply() {
        let mut c = console();
        assert_eq!(c.submit("why do you hate me"), Disposition::Swallowed);
        assert_eq!(c.submit("listen!!"), Disposition::Swallowed);
        assert_eq!(c.replies().count(), 0);
    }

    #[test]
    fn technical_input_is_simplified() {
        let mut c = console();
        let got = c.submit("SELECT * FROM ports; -- please");
        assert_eq!(
            got,
            Disposition::Simplified("select from ports please".to_string())
        );
        assert_eq!(c.replies().last(), Some(&"intent unclear".to_string()));
    }

    #[test]
    fn plain_input_draws_a_canned_reply() {
        let mut c = console();
        assert_eq!(c.submit("hello there"), Disposition::Acknowledged);
        let reply = c.replies().next().cloned().unwrap_or_default();
        assert!(PLAIN_REPLIES.contains(&reply.as_str()));
    }

    #[test]
    fn input_is_truncated_before_classification() {
        let mut c = console();
        // The brace lands past the 80-char cut, so this is not technical.
        let long = format!("{}{{}}", "a".repeat(INPUT_MAX));
        assert_eq!(c.submit(&long), Disposition::Acknowledged);
    }

    #[test]
    fn replies_ring_caps_at_five() {
        let mut c = console();
        for i in 0..12 {
            c.submit(&format!("plain line {i}"));
        }
        assert_eq!(c.replies().count(), REPLY_CAP);
    }

    #[test]
    fn reset_clears_replies() {
        let mut c = console();
        c.submit("hello");
        c.reset();
        assert_eq!(c.replies().count(), 0);
    }
}
