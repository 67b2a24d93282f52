use serde::Deserialize;
use std::io::{self, BufRead, Write};

use crate::core::error::{CoordinateError, SetRole};
use crate::core::{parse, MatchResult, Matcher};
use crate::models::{Coordinate, CoordinateSet, RejectedEntry};

/// What to do when a point is entered twice into the same set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep the duplicate, tell the user
    #[default]
    Warn,
    /// Refuse the duplicate
    Reject,
}

/// Result of submitting one entry to a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryOutcome {
    Added { index: usize },
    DuplicateKept { index: usize, existing: usize },
    DuplicateRejected { existing: usize },
}

/// State of an interactive entry session
///
/// Collects a source and a target set one line at a time. Every attempt,
/// good or bad, gets an entry number used in rejection reports.
#[derive(Debug, Clone, Default)]
pub struct PromptSession {
    policy: DuplicatePolicy,
    source: CoordinateSet,
    target: CoordinateSet,
    rejected: Vec<(SetRole, RejectedEntry)>,
    attempts: usize,
}

impl PromptSession {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Parse `raw` and add it to the chosen set
    pub fn submit(&mut self, role: SetRole, raw: &str) -> Result<EntryOutcome, CoordinateError> {
        let attempt = self.attempts;
        self.attempts += 1;

        let coordinate = match parse(raw) {
            Ok(c) => c,
            Err(error) => {
                self.rejected.push((
                    role,
                    RejectedEntry {
                        index: attempt,
                        raw: raw.to_string(),
                        error: error.clone(),
                    },
                ));
                return Err(error);
            }
        };

        Ok(self.insert(role, coordinate))
    }

    fn insert(&mut self, role: SetRole, coordinate: Coordinate) -> EntryOutcome {
        let policy = self.policy;
        let set = self.set_mut(role);

        match (set.position(&coordinate), policy) {
            (Some(existing), DuplicatePolicy::Reject) => {
                tracing::debug!("Rejected duplicate {} in {} set", coordinate, role);
                EntryOutcome::DuplicateRejected { existing }
            }
            (Some(existing), DuplicatePolicy::Warn) => EntryOutcome::DuplicateKept {
                index: set.push(coordinate),
                existing,
            },
            (None, _) => EntryOutcome::Added {
                index: set.push(coordinate),
            },
        }
    }

    pub fn set(&self, role: SetRole) -> &CoordinateSet {
        match role {
            SetRole::Source => &self.source,
            SetRole::Target => &self.target,
        }
    }

    fn set_mut(&mut self, role: SetRole) -> &mut CoordinateSet {
        match role {
            SetRole::Source => &mut self.source,
            SetRole::Target => &mut self.target,
        }
    }

    pub fn rejected(&self) -> &[(SetRole, RejectedEntry)] {
        &self.rejected
    }

    /// Rejected entries of one set, in entry order
    pub fn rejected_in(&self, role: SetRole) -> Vec<RejectedEntry> {
        self.rejected
            .iter()
            .filter(|(r, _)| *r == role)
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    /// Match the collected source set against the target set
    pub fn run(&self, matcher: &Matcher) -> MatchResult {
        matcher.find_matches(self.source.as_slice(), self.target.as_slice())
    }
}

/// Word that ends entry of the current set
pub const DONE_KEYWORD: &str = "done";

/// Prompt for the source set, then the target set
///
/// Blank lines are ignored; `done` or end of input closes a set. Bad
/// entries are reported and the user is asked again.
pub fn run_prompt_loop<R, W>(
    session: &mut PromptSession,
    input: &mut R,
    output: &mut W,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    for role in [SetRole::Source, SetRole::Target] {
        writeln!(
            output,
            "Enter {role} coordinates as 'lat,lon' (decimal or DMS), '{DONE_KEYWORD}' to finish:"
        )?;

        loop {
            write!(output, "{role}> ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }

            let entry = line.trim();
            if entry.is_empty() {
                continue;
            }
            if entry.eq_ignore_ascii_case(DONE_KEYWORD) {
                break;
            }

            match session.submit(role, entry) {
                Ok(EntryOutcome::Added { .. }) => {}
                Ok(EntryOutcome::DuplicateKept { existing, .. }) => writeln!(
                    output,
                    "warning: {entry} duplicates {role} point #{}",
                    existing + 1
                )?,
                Ok(EntryOutcome::DuplicateRejected { existing }) => writeln!(
                    output,
                    "rejected: {entry} duplicates {role} point #{}",
                    existing + 1
                )?,
                Err(e) => writeln!(output, "error: {e}, try again")?,
            }
        }

        writeln!(output, "{} {role} points entered", session.set(role).len())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_submit_tracks_rejections() {
        let mut session = PromptSession::new(DuplicatePolicy::Warn);

        assert!(session.submit(SetRole::Source, "1,2").is_ok());
        assert!(session.submit(SetRole::Source, "oops").is_err());
        assert!(session.submit(SetRole::Target, "100,0").is_err());

        assert_eq!(session.set(SetRole::Source).len(), 1);
        assert_eq!(session.rejected().len(), 2);
        assert_eq!(session.rejected()[0].1.index, 1);
        assert_eq!(session.rejected()[1].0, SetRole::Target);

        let source = session.rejected_in(SetRole::Source);
        assert_eq!(source.len(), 1);
        assert_eq!(source[0].raw, "oops");
        assert_eq!(session.rejected_in(SetRole::Target)[0].error.kind(), "validation");
    }

    #[test]
    fn test_duplicate_policies() {
        let mut warn = PromptSession::new(DuplicatePolicy::Warn);
        warn.submit(SetRole::Target, "1,2").unwrap();
        assert_eq!(
            warn.submit(SetRole::Target, "1.0, 2.0").unwrap(),
            EntryOutcome::DuplicateKept { index: 1, existing: 0 }
        );

        let mut reject = PromptSession::new(DuplicatePolicy::Reject);
        reject.submit(SetRole::Target, "1,2").unwrap();
        assert_eq!(
            reject.submit(SetRole::Target, "1,2").unwrap(),
            EntryOutcome::DuplicateRejected { existing: 0 }
        );
        assert_eq!(reject.set(SetRole::Target).len(), 1);
    }

    #[test]
    fn test_same_point_in_both_sets_is_not_a_duplicate() {
        let mut session = PromptSession::new(DuplicatePolicy::Reject);
        session.submit(SetRole::Source, "5,5").unwrap();
        assert_eq!(
            session.submit(SetRole::Target, "5,5").unwrap(),
            EntryOutcome::Added { index: 0 }
        );
    }

    #[test]
    fn test_prompt_loop_reads_both_sets() {
        let mut session = PromptSession::new(DuplicatePolicy::Warn);
        let mut input = Cursor::new("0,0\n\nbad\n10,10\ndone\n0,90\n15,15\n-10,-10\n");
        let mut output = Vec::new();

        run_prompt_loop(&mut session, &mut input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("error: cannot parse 'bad'"));
        assert!(text.contains("2 source points entered"));
        assert!(text.contains("3 target points entered"));

        let result = session.run(&Matcher::new());
        assert_eq!(result.matches[0].target_index, Some(2));
        assert_eq!(result.matches[1].target_index, Some(1));
    }
}
