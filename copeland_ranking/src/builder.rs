pub use crate::config::*;

use crate::run_copeland;

/// A builder for assembling a poll and its ballots.
///
/// Candidate names are checked when they are added, the same way a poll is
/// checked when it is created: names must be non-empty and unique.
///
/// ```
/// pub use copeland_ranking::builder::Builder;
/// pub use copeland_ranking::TabulationRules;
/// # use copeland_ranking::{Candidate, VotingErrors};
///
/// let mut builder = Builder::new(&TabulationRules::DEFAULT_RULES)?
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_ballot_simple(&["Bob".to_string()])?;
/// builder.add_ballot_simple(&["Bob".to_string(), "Anna".to_string()])?;
/// builder.add_write_in(Candidate::new("Clara"))?;
/// builder.add_ballot_simple(&["Clara".to_string(), "Bob".to_string()])?;
///
/// let result = builder.tabulate();
/// assert_eq!(result.winners(), vec!["Bob".to_string()]);
///
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: TabulationRules,
    pub(crate) _candidates: Vec<Candidate>,
    pub(crate) _ballots: Vec<Ballot>,
}

impl Builder {
    pub fn new(rules: &TabulationRules) -> Result<Builder, VotingErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _candidates: Vec::new(),
            _ballots: Vec::new(),
        })
    }

    /// Sets the initial candidates of the poll. Any ballot added before is dropped.
    pub fn candidates(self, cands: &[String]) -> Result<Builder, VotingErrors> {
        let mut builder = Builder {
            _rules: self._rules,
            _candidates: Vec::new(),
            _ballots: Vec::new(),
        };
        for name in cands.iter() {
            builder.add_write_in(Candidate::new(name))?;
        }
        Ok(builder)
    }

    /// Adds a candidate after the creation of the poll.
    ///
    /// The ballots already submitted are kept: they do not rank the new candidate.
    pub fn add_write_in(&mut self, candidate: Candidate) -> Result<(), VotingErrors> {
        if candidate.name.trim().is_empty() {
            return Err(VotingErrors::EmptyCandidateName);
        }
        if self._candidates.iter().any(|c| c.name == candidate.name) {
            return Err(VotingErrors::DuplicateCandidate(candidate.name));
        }
        self._candidates.push(candidate);
        Ok(())
    }

    /// Adds a ballot with a generated id and no voter name.
    ///
    /// It is the simplest use case for most cases.
    pub fn add_ballot_simple(&mut self, rankings: &[String]) -> Result<(), VotingErrors> {
        let id = format!("ballot-{}", self._ballots.len() + 1);
        self.add_ballot(&Ballot {
            id,
            name: String::new(),
            rankings: rankings.to_vec(),
            timestamp: None,
        })
    }

    pub fn add_ballot(&mut self, ballot: &Ballot) -> Result<(), VotingErrors> {
        self._ballots.push(ballot.clone());
        Ok(())
    }

    pub fn tabulate(&self) -> CopelandResult {
        run_copeland(&self._candidates, &self._ballots, &self._rules)
    }
}
