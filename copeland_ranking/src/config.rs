// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A candidate of a poll.
///
/// Names are expected to be unique within a poll. Candidates added after the
/// creation of the poll (write-ins) are simply appended to the list.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Candidate {
    pub name: String,
    pub description: Option<String>,
}

impl Candidate {
    pub fn new(name: &str) -> Candidate {
        Candidate {
            name: name.to_string(),
            description: None,
        }
    }
}

/// A ballot, as submitted by a voter.
///
/// `rankings` lists candidate names, most preferred first. It may be partial
/// (or empty): the candidates that do not appear are considered tied for the
/// last place on this ballot.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Ballot {
    pub id: String,
    /// Display name of the voter. Not verified in any way.
    pub name: String,
    pub rankings: Vec<String>,
    /// Submission time, in milliseconds since the epoch, if known.
    pub timestamp: Option<u64>,
}

// ******** Output data structures *********

/// A Copeland score, stored as a number of half points.
///
/// Each win is worth one point and each tie half a point.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Default)]
pub struct Score(u32);

impl Score {
    pub const ZERO: Score = Score(0);

    pub fn from_half_points(half_points: u32) -> Score {
        Score(half_points)
    }

    pub fn half_points(&self) -> u32 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 2.0
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}.5", self.0 / 2)
        }
    }
}

/// One pairwise contest won by a candidate.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Victory {
    pub opponent: String,
    pub votes_for_self: u64,
    pub votes_for_opponent: u64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateResult {
    pub name: String,
    /// The contests won by this candidate. Losses and ties are not reported here.
    pub victories: Vec<Victory>,
}

/// A group of candidates sharing the same score, hence the same rank.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankTier {
    /// Standard competition ranking: 1 + the number of candidates strictly ahead.
    pub rank: u32,
    pub score: Score,
    pub candidates: Vec<CandidateResult>,
}

/// Anomalies found in the input. None of them prevents the tabulation.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub enum TabulationWarning {
    /// A ballot ranks a name that is not in the candidate list. The name is ignored.
    UnknownCandidateReference { ballot_id: String, name: String },
    /// A ballot ranks the same candidate more than once. Only the first occurrence counts.
    DuplicateInRanking { ballot_id: String, name: String },
    /// The candidate list contains the same name twice. Only the first entry counts.
    DuplicateCandidate { name: String },
}

impl Display for TabulationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TabulationWarning::UnknownCandidateReference { ballot_id, name } => write!(
                f,
                "ballot {}: unknown candidate {:?} ignored",
                ballot_id, name
            ),
            TabulationWarning::DuplicateInRanking { ballot_id, name } => write!(
                f,
                "ballot {}: candidate {:?} ranked more than once, keeping the first rank",
                ballot_id, name
            ),
            TabulationWarning::DuplicateCandidate { name } => {
                write!(f, "candidate {:?} declared more than once", name)
            }
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CopelandResult {
    /// Ordered by decreasing score.
    pub tiers: Vec<RankTier>,
    /// The candidates that lost at least one contest, weakest first.
    /// They are the columns of the pairwise audit table.
    pub defeated_candidates: Vec<String>,
    pub warnings: Vec<TabulationWarning>,
}

impl CopelandResult {
    /// True when there was no candidate to rank.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// The candidates of the first tier, if any.
    pub fn winners(&self) -> Vec<String> {
        self.tiers
            .first()
            .map(|t| t.candidates.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default()
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ContestOutcome {
    Win(String),
    Tie,
}

/// A head-to-head contest between two candidates.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PairwiseContest {
    pub candidate_a: String,
    pub candidate_b: String,
    pub votes_for_a: u64,
    pub votes_for_b: u64,
}

impl PairwiseContest {
    pub fn outcome(&self) -> ContestOutcome {
        match self.votes_for_a.cmp(&self.votes_for_b) {
            std::cmp::Ordering::Greater => ContestOutcome::Win(self.candidate_a.clone()),
            std::cmp::Ordering::Less => ContestOutcome::Win(self.candidate_b.clone()),
            std::cmp::Ordering::Equal => ContestOutcome::Tie,
        }
    }
}

/// Errors raised when assembling a poll.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    EmptyCandidateName,
    DuplicateCandidate(String),
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::EmptyCandidateName => write!(f, "candidate names cannot be empty"),
            VotingErrors::DuplicateCandidate(name) => {
                write!(f, "candidate {:?} is already part of the poll", name)
            }
        }
    }
}

// ********* Configuration **********

/// How candidates sharing a tier are ordered in the output.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TieBreakMode {
    /// Order of the candidate list (write-ins come last).
    UseCandidateOrder,
    /// Lexical order of the names.
    Alphabetical,
}

/// How a ballot treats the candidates it does not rank.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum UnrankedCandidateMode {
    /// Unranked candidates are behind every ranked candidate.
    LeastPreferred,
    /// The ballot only takes part in the contests between two ranked candidates.
    Abstain,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TabulationRules {
    pub tiebreak_mode: TieBreakMode,
    pub unranked_mode: UnrankedCandidateMode,
}

impl TabulationRules {
    pub const DEFAULT_RULES: TabulationRules = TabulationRules {
        tiebreak_mode: TieBreakMode::UseCandidateOrder,
        unranked_mode: UnrankedCandidateMode::LeastPreferred,
    };
}

impl Default for TabulationRules {
    fn default() -> Self {
        TabulationRules::DEFAULT_RULES
    }
}
