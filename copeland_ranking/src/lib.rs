/*!
Tabulation of ranked ballots with Copeland's method.

Every pair of candidates is compared head-to-head across all the ballots. A candidate
gets one point for each contest it wins and half a point for each tie. Candidates
are then grouped into tiers of equal score.

```
use copeland_ranking::*;

let candidates = vec![Candidate::new("Anna"), Candidate::new("Bob")];
let ballot = |id: &str, ranks: &[&str]| Ballot {
    id: id.to_string(),
    name: id.to_string(),
    rankings: ranks.iter().map(|s| s.to_string()).collect(),
    timestamp: None,
};
let ballots = vec![
    ballot("1", &["Anna", "Bob"]),
    ballot("2", &["Anna", "Bob"]),
    ballot("3", &["Bob", "Anna"]),
];

let result = run_copeland(&candidates, &ballots, &TabulationRules::DEFAULT_RULES);
assert_eq!(result.winners(), vec!["Anna".to_string()]);
assert_eq!(result.defeated_candidates, vec!["Bob".to_string()]);
```

The computation holds no state: it can be run again each time a ballot or a
write-in candidate is added.
*/
pub mod builder;
mod config;
pub mod manual;

use log::{debug, info, warn};

use std::{
    cmp::Reverse,
    collections::{BTreeSet, HashMap, HashSet},
    ops::AddAssign,
};

pub use crate::config::*;

// **** Private structures ****

// Index of the candidate in the (deduplicated) candidate list.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct CandidateId(u32);

impl CandidateId {
    fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
    const ONE: VoteCount = VoteCount(1);
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

// A ballot restricted to the known candidates, most preferred first, without duplicates.
#[derive(Eq, PartialEq, Debug, Clone)]
struct BallotInternal {
    ranks: Vec<CandidateId>,
}

// Result of a contest, from the point of view of the first candidate.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Outcome {
    Win,
    Loss,
    Tie,
}

// Square matrix: votes[a][b] is the number of ballots that prefer a over b.
#[derive(Eq, PartialEq, Debug, Clone)]
struct PairwiseTally {
    size: usize,
    votes: Vec<VoteCount>,
}

impl PairwiseTally {
    fn new(size: usize) -> PairwiseTally {
        PairwiseTally {
            size,
            votes: vec![VoteCount::EMPTY; size * size],
        }
    }

    fn get(&self, a: CandidateId, b: CandidateId) -> VoteCount {
        self.votes[a.idx() * self.size + b.idx()]
    }

    fn add_preference(&mut self, winner: CandidateId, loser: CandidateId) {
        self.votes[winner.idx() * self.size + loser.idx()] += VoteCount::ONE;
    }

    fn outcome(&self, a: CandidateId, b: CandidateId) -> Outcome {
        let (for_a, for_b) = (self.get(a, b), self.get(b, a));
        if for_a > for_b {
            Outcome::Win
        } else if for_a < for_b {
            Outcome::Loss
        } else {
            Outcome::Tie
        }
    }

    fn opponents(&self, cid: CandidateId) -> impl Iterator<Item = CandidateId> + '_ {
        (0..self.size as u32)
            .map(CandidateId)
            .filter(move |other| *other != cid)
    }
}

struct CheckResult {
    // Indexed by CandidateId.
    candidates: Vec<String>,
    ballots: Vec<BallotInternal>,
    warnings: BTreeSet<TabulationWarning>,
}

/// Runs Copeland's method on the given ballots.
///
/// Arguments:
/// * `candidates` the candidates of the poll, in declaration order. Write-ins are
/// expected at the end.
/// * `ballots` all the ballots currently submitted.
/// * `rules` the rules for unranked candidates and for ordering tied candidates.
///
/// This never fails: names that are not candidates, or that are ranked twice on
/// the same ballot, are reported in the warnings of the result.
pub fn run_copeland(
    candidates: &[Candidate],
    ballots: &[Ballot],
    rules: &TabulationRules,
) -> CopelandResult {
    info!(
        "run_copeland: Processing {:?} ballots, {:?} candidates, rules: {:?}",
        ballots.len(),
        candidates.len(),
        rules
    );
    let cr = checks(candidates, ballots);
    for w in cr.warnings.iter() {
        warn!("run_copeland: {}", w);
    }
    let warnings: Vec<TabulationWarning> = cr.warnings.into_iter().collect();

    if cr.candidates.is_empty() {
        info!("run_copeland: no candidate, nothing to rank");
        return CopelandResult {
            tiers: Vec::new(),
            defeated_candidates: Vec::new(),
            warnings,
        };
    }

    let tally = build_pairwise_tally(cr.candidates.len(), &cr.ballots, rules.unranked_mode);
    let scores = compute_scores(&tally);
    debug!("run_copeland: scores: {:?}", scores);

    let order = sort_candidates(&cr.candidates, &scores, rules.tiebreak_mode);
    let tiers = build_tiers(&order, &scores, &tally, &cr.candidates);
    for t in tiers.iter() {
        let names: Vec<&String> = t.candidates.iter().map(|c| &c.name).collect();
        info!("Rank {} (score {}): {:?}", t.rank, t.score, names);
    }
    let defeated_candidates = find_defeated_candidates(&order, &tally, &cr.candidates);
    debug!(
        "run_copeland: defeated candidates: {:?}",
        defeated_candidates
    );

    CopelandResult {
        tiers,
        defeated_candidates,
        warnings,
    }
}

/// All the pairwise contests of the poll.
///
/// For each pair, `candidate_a` comes before `candidate_b` in the candidate list.
pub fn pairwise_contests(
    candidates: &[Candidate],
    ballots: &[Ballot],
    rules: &TabulationRules,
) -> Vec<PairwiseContest> {
    let cr = checks(candidates, ballots);
    let tally = build_pairwise_tally(cr.candidates.len(), &cr.ballots, rules.unranked_mode);
    let mut res: Vec<PairwiseContest> = Vec::new();
    for a in 0..cr.candidates.len() {
        for b in (a + 1)..cr.candidates.len() {
            let (cid_a, cid_b) = (CandidateId(a as u32), CandidateId(b as u32));
            res.push(PairwiseContest {
                candidate_a: cr.candidates[a].clone(),
                candidate_b: cr.candidates[b].clone(),
                votes_for_a: tally.get(cid_a, cid_b).0,
                votes_for_b: tally.get(cid_b, cid_a).0,
            });
        }
    }
    res
}

/// A content hash of the candidate list and of the set of ballot ids.
///
/// Two calls return the same value if and only if (up to collisions) the tabulation
/// inputs are the same, which makes it usable as a cache key for results.
/// The order of the ballots does not matter, the order of the candidates does.
pub fn fingerprint(candidates: &[Candidate], ballots: &[Ballot]) -> String {
    let mut ids: Vec<&str> = ballots.iter().map(|b| b.id.as_str()).collect();
    ids.sort_unstable();
    let mut data = String::new();
    for c in candidates.iter() {
        data.push_str("c:");
        data.push_str(&c.name);
        data.push('\n');
    }
    for id in ids {
        data.push_str("b:");
        data.push_str(id);
        data.push('\n');
    }
    sha256::digest(data.as_str())
}

// Candidates are returned in the same order.
fn checks(reg_candidates: &[Candidate], coll: &[Ballot]) -> CheckResult {
    let mut warnings: BTreeSet<TabulationWarning> = BTreeSet::new();

    let mut candidate_ids: HashMap<&str, CandidateId> = HashMap::new();
    let mut candidates: Vec<String> = Vec::new();
    for c in reg_candidates.iter() {
        if candidate_ids.contains_key(c.name.as_str()) {
            warnings.insert(TabulationWarning::DuplicateCandidate {
                name: c.name.clone(),
            });
            continue;
        }
        candidate_ids.insert(c.name.as_str(), CandidateId(candidates.len() as u32));
        candidates.push(c.name.clone());
    }

    let mut ballots: Vec<BallotInternal> = Vec::new();
    for b in coll.iter() {
        let mut seen: HashSet<CandidateId> = HashSet::new();
        let mut ranks: Vec<CandidateId> = Vec::new();
        for name in b.rankings.iter() {
            match candidate_ids.get(name.as_str()) {
                Some(cid) if seen.contains(cid) => {
                    warnings.insert(TabulationWarning::DuplicateInRanking {
                        ballot_id: b.id.clone(),
                        name: name.clone(),
                    });
                }
                Some(cid) => {
                    seen.insert(*cid);
                    ranks.push(*cid);
                }
                None => {
                    warnings.insert(TabulationWarning::UnknownCandidateReference {
                        ballot_id: b.id.clone(),
                        name: name.clone(),
                    });
                }
            }
        }
        debug!("checks: ballot {}: ranks: {:?}", b.id, ranks);
        ballots.push(BallotInternal { ranks });
    }

    CheckResult {
        candidates,
        ballots,
        warnings,
    }
}

fn build_pairwise_tally(
    num_candidates: usize,
    ballots: &[BallotInternal],
    unranked_mode: UnrankedCandidateMode,
) -> PairwiseTally {
    let mut tally = PairwiseTally::new(num_candidates);
    // Reused across ballots: the position of each candidate on the current ballot.
    let mut positions: Vec<Option<usize>> = vec![None; num_candidates];
    for ballot in ballots.iter() {
        positions.iter_mut().for_each(|p| *p = None);
        for (pos, cid) in ballot.ranks.iter().enumerate() {
            positions[cid.idx()] = Some(pos);
        }
        for a in 0..num_candidates {
            for b in (a + 1)..num_candidates {
                let (cid_a, cid_b) = (CandidateId(a as u32), CandidateId(b as u32));
                match (positions[a], positions[b]) {
                    (Some(pos_a), Some(pos_b)) if pos_a < pos_b => {
                        tally.add_preference(cid_a, cid_b)
                    }
                    (Some(_), Some(_)) => tally.add_preference(cid_b, cid_a),
                    (Some(_), None) if unranked_mode == UnrankedCandidateMode::LeastPreferred => {
                        tally.add_preference(cid_a, cid_b)
                    }
                    (None, Some(_)) if unranked_mode == UnrankedCandidateMode::LeastPreferred => {
                        tally.add_preference(cid_b, cid_a)
                    }
                    // Silent on at least one of the two.
                    _ => {}
                }
            }
        }
    }
    tally
}

// Indexed by CandidateId.
fn compute_scores(tally: &PairwiseTally) -> Vec<Score> {
    (0..tally.size as u32)
        .map(CandidateId)
        .map(|cid| {
            let half_points: u32 = tally
                .opponents(cid)
                .map(|other| match tally.outcome(cid, other) {
                    Outcome::Win => 2,
                    Outcome::Tie => 1,
                    Outcome::Loss => 0,
                })
                .sum();
            Score::from_half_points(half_points)
        })
        .collect()
}

// Decreasing score, then the tiebreak order.
fn sort_candidates(
    names: &[String],
    scores: &[Score],
    tiebreak: TieBreakMode,
) -> Vec<CandidateId> {
    let mut order: Vec<CandidateId> = (0..names.len() as u32).map(CandidateId).collect();
    match tiebreak {
        TieBreakMode::UseCandidateOrder => {
            order.sort_by_key(|cid| (Reverse(scores[cid.idx()]), *cid));
        }
        TieBreakMode::Alphabetical => {
            order.sort_by_key(|cid| (Reverse(scores[cid.idx()]), &names[cid.idx()], *cid));
        }
    }
    order
}

fn build_tiers(
    order: &[CandidateId],
    scores: &[Score],
    tally: &PairwiseTally,
    names: &[String],
) -> Vec<RankTier> {
    // Where each candidate ends up in the output. Victories are listed weakest opponent
    // first, which is the column order of the audit table.
    let mut position: Vec<usize> = vec![0; order.len()];
    for (pos, cid) in order.iter().enumerate() {
        position[cid.idx()] = pos;
    }

    let mut tiers: Vec<RankTier> = Vec::new();
    for (pos, &cid) in order.iter().enumerate() {
        let score = scores[cid.idx()];
        let mut beaten: Vec<CandidateId> = tally
            .opponents(cid)
            .filter(|other| tally.outcome(cid, *other) == Outcome::Win)
            .collect();
        beaten.sort_by_key(|other| Reverse(position[other.idx()]));
        let victories: Vec<Victory> = beaten
            .iter()
            .map(|other| Victory {
                opponent: names[other.idx()].clone(),
                votes_for_self: tally.get(cid, *other).0,
                votes_for_opponent: tally.get(*other, cid).0,
            })
            .collect();
        let cand_result = CandidateResult {
            name: names[cid.idx()].clone(),
            victories,
        };
        match tiers.last_mut() {
            Some(tier) if tier.score == score => tier.candidates.push(cand_result),
            _ => tiers.push(RankTier {
                rank: pos as u32 + 1,
                score,
                candidates: vec![cand_result],
            }),
        }
    }
    tiers
}

/// Candidates that had at least one defeat, weakest first.
fn find_defeated_candidates(
    order: &[CandidateId],
    tally: &PairwiseTally,
    names: &[String],
) -> Vec<String> {
    order
        .iter()
        .rev()
        .filter(|cid| {
            tally
                .opponents(**cid)
                .any(|other| tally.outcome(**cid, other) == Outcome::Loss)
        })
        .map(|cid| names[cid.idx()].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn cands(names: &[&str]) -> Vec<Candidate> {
        names.iter().map(|n| Candidate::new(n)).collect()
    }

    fn ballot(id: &str, ranks: &[&str]) -> Ballot {
        Ballot {
            id: id.to_string(),
            name: format!("voter {}", id),
            rankings: ranks.iter().map(|s| s.to_string()).collect(),
            timestamp: None,
        }
    }

    fn tier_names(res: &CopelandResult) -> Vec<Vec<String>> {
        res.tiers
            .iter()
            .map(|t| t.candidates.iter().map(|c| c.name.clone()).collect())
            .collect()
    }

    fn victory(opponent: &str, votes_for_self: u64, votes_for_opponent: u64) -> Victory {
        Victory {
            opponent: opponent.to_string(),
            votes_for_self,
            votes_for_opponent,
        }
    }

    fn tabulate(candidates: &[Candidate], ballots: &[Ballot]) -> CopelandResult {
        run_copeland(candidates, ballots, &TabulationRules::DEFAULT_RULES)
    }

    #[test]
    fn condorcet_cycle_is_a_single_tier() {
        init();
        let res = tabulate(
            &cands(&["X", "Y", "Z"]),
            &[
                ballot("1", &["X", "Y", "Z"]),
                ballot("2", &["Y", "Z", "X"]),
                ballot("3", &["Z", "X", "Y"]),
            ],
        );
        assert_eq!(res.tiers.len(), 1);
        let tier = &res.tiers[0];
        assert_eq!(tier.rank, 1);
        assert_eq!(tier.score, Score::from_half_points(2));
        assert_eq!(tier_names(&res), vec![vec!["X", "Y", "Z"]]);
        assert_eq!(tier.candidates[0].victories, vec![victory("Y", 2, 1)]);
        assert_eq!(tier.candidates[1].victories, vec![victory("Z", 2, 1)]);
        assert_eq!(tier.candidates[2].victories, vec![victory("X", 2, 1)]);
        assert_eq!(res.defeated_candidates, vec!["Z", "Y", "X"]);
        assert!(res.warnings.is_empty());
    }

    #[test]
    fn simple_majority() {
        init();
        let res = tabulate(
            &cands(&["A", "B"]),
            &[
                ballot("1", &["A", "B"]),
                ballot("2", &["A", "B"]),
                ballot("3", &["B", "A"]),
            ],
        );
        assert_eq!(
            res.tiers,
            vec![
                RankTier {
                    rank: 1,
                    score: Score::from_half_points(2),
                    candidates: vec![CandidateResult {
                        name: "A".to_string(),
                        victories: vec![victory("B", 2, 1)],
                    }],
                },
                RankTier {
                    rank: 2,
                    score: Score::ZERO,
                    candidates: vec![CandidateResult {
                        name: "B".to_string(),
                        victories: vec![],
                    }],
                },
            ]
        );
        assert_eq!(res.defeated_candidates, vec!["B"]);
        assert_eq!(res.winners(), vec!["A"]);
    }

    #[test]
    fn no_ballots_everyone_ties() {
        init();
        let res = tabulate(&cands(&["A", "B"]), &[]);
        assert_eq!(res.tiers.len(), 1);
        assert_eq!(res.tiers[0].rank, 1);
        assert_eq!(res.tiers[0].score.as_f64(), 0.5);
        assert_eq!(tier_names(&res), vec![vec!["A", "B"]]);
        assert!(res.defeated_candidates.is_empty());
    }

    #[test]
    fn unranked_candidates_are_least_preferred() {
        init();
        let candidates = cands(&["A", "B", "C"]);
        let ballots = [ballot("1", &["A"])];
        let contests = pairwise_contests(&candidates, &ballots, &TabulationRules::DEFAULT_RULES);
        let votes: Vec<(&str, &str, u64, u64)> = contests
            .iter()
            .map(|c| {
                (
                    c.candidate_a.as_str(),
                    c.candidate_b.as_str(),
                    c.votes_for_a,
                    c.votes_for_b,
                )
            })
            .collect();
        assert_eq!(
            votes,
            vec![("A", "B", 1, 0), ("A", "C", 1, 0), ("B", "C", 0, 0)]
        );

        let res = tabulate(&candidates, &ballots);
        assert_eq!(tier_names(&res), vec![vec!["A"], vec!["B", "C"]]);
        assert_eq!(res.tiers[0].score, Score::from_half_points(4));
        assert_eq!(res.tiers[1].rank, 2);
        assert_eq!(res.tiers[1].score, Score::from_half_points(1));
        assert_eq!(
            res.tiers[0].candidates[0].victories,
            vec![victory("C", 1, 0), victory("B", 1, 0)]
        );
        assert_eq!(res.defeated_candidates, vec!["C", "B"]);
    }

    #[test]
    fn abstain_mode_ignores_unranked_candidates() {
        init();
        let rules = TabulationRules {
            unranked_mode: UnrankedCandidateMode::Abstain,
            ..TabulationRules::DEFAULT_RULES
        };
        let candidates = cands(&["A", "B", "C"]);
        let ballots = [ballot("1", &["A"]), ballot("2", &["C", "B"])];
        let contests = pairwise_contests(&candidates, &ballots, &rules);
        let votes: Vec<(u64, u64)> = contests
            .iter()
            .map(|c| (c.votes_for_a, c.votes_for_b))
            .collect();
        assert_eq!(votes, vec![(0, 0), (0, 0), (0, 1)]);

        let res = run_copeland(&candidates, &ballots, &rules);
        assert_eq!(tier_names(&res), vec![vec!["C"], vec!["A"], vec!["B"]]);
        assert_eq!(
            res.tiers.iter().map(|t| t.rank).collect::<Vec<u32>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn competition_ranking_leaves_gaps() {
        init();
        let res = tabulate(
            &cands(&["D", "C", "B", "A"]),
            &[
                ballot("1", &["A", "B", "C", "D"]),
                ballot("2", &["A", "C", "B", "D"]),
            ],
        );
        assert_eq!(tier_names(&res), vec![vec!["A"], vec!["C", "B"], vec!["D"]]);
        let ranks: Vec<(u32, f64)> = res.tiers.iter().map(|t| (t.rank, t.score.as_f64())).collect();
        assert_eq!(ranks, vec![(1, 3.0), (2, 1.5), (4, 0.0)]);
        assert_eq!(res.defeated_candidates, vec!["D", "B", "C"]);
        assert_eq!(
            res.tiers[0].candidates[0].victories,
            vec![victory("D", 2, 0), victory("B", 2, 0), victory("C", 2, 0)]
        );
    }

    #[test]
    fn alphabetical_tiebreak() {
        init();
        let rules = TabulationRules {
            tiebreak_mode: TieBreakMode::Alphabetical,
            ..TabulationRules::DEFAULT_RULES
        };
        let res = run_copeland(&cands(&["Zoe", "Max", "Ann"]), &[], &rules);
        assert_eq!(tier_names(&res), vec![vec!["Ann", "Max", "Zoe"]]);
    }

    #[test]
    fn empty_and_single_candidate_polls() {
        init();
        let res = tabulate(&[], &[ballot("1", &["A"])]);
        assert!(res.is_empty());
        assert!(res.defeated_candidates.is_empty());
        assert!(res.winners().is_empty());
        assert_eq!(
            res.warnings,
            vec![TabulationWarning::UnknownCandidateReference {
                ballot_id: "1".to_string(),
                name: "A".to_string()
            }]
        );

        let res = tabulate(&cands(&["A"]), &[ballot("1", &["A"]), ballot("2", &[])]);
        assert_eq!(tier_names(&res), vec![vec!["A"]]);
        assert_eq!(res.tiers[0].score, Score::ZERO);
        assert!(res.defeated_candidates.is_empty());
    }

    #[test]
    fn stale_and_duplicated_names_are_reported() {
        init();
        let res = tabulate(
            &cands(&["A", "B", "A"]),
            &[
                ballot("2", &["Ghost", "B", "A"]),
                ballot("1", &["B", "B", "A"]),
            ],
        );
        assert_eq!(tier_names(&res), vec![vec!["B"], vec!["A"]]);
        assert_eq!(res.tiers[0].candidates[0].victories, vec![victory("A", 2, 0)]);
        assert_eq!(
            res.warnings,
            vec![
                TabulationWarning::UnknownCandidateReference {
                    ballot_id: "2".to_string(),
                    name: "Ghost".to_string()
                },
                TabulationWarning::DuplicateInRanking {
                    ballot_id: "1".to_string(),
                    name: "B".to_string()
                },
                TabulationWarning::DuplicateCandidate {
                    name: "A".to_string()
                },
            ]
        );
    }

    #[test]
    fn write_in_after_ballots() {
        init();
        // The first two ballots were cast before "W" existed.
        let res = tabulate(
            &cands(&["A", "B", "W"]),
            &[
                ballot("1", &["A", "B"]),
                ballot("2", &["B", "A"]),
                ballot("3", &["W", "B", "A"]),
            ],
        );
        assert_eq!(tier_names(&res), vec![vec!["B"], vec!["A"], vec!["W"]]);
        assert_eq!(
            res.tiers[0].candidates[0].victories,
            vec![victory("W", 2, 1), victory("A", 2, 1)]
        );
        assert_eq!(res.tiers[1].candidates[0].victories, vec![victory("W", 2, 1)]);
        assert_eq!(res.tiers[1].score.to_string(), "1");
        assert_eq!(res.tiers[2].rank, 3);
        assert_eq!(res.defeated_candidates, vec!["W", "A"]);
    }

    #[test]
    fn fingerprint_ignores_ballot_order() {
        let candidates = cands(&["A", "B"]);
        let b1 = ballot("b1", &["A"]);
        let b2 = ballot("b2", &["B"]);
        let f1 = fingerprint(&candidates, &[b1.clone(), b2.clone()]);
        let f2 = fingerprint(&candidates, &[b2, b1.clone()]);
        assert_eq!(f1, f2);
        assert_eq!(
            f1,
            "1a5931c97139a1391cd4e2a93c47970f6bdafe3d27b58401cfbd1661fb45e48c"
        );
        assert_ne!(f1, fingerprint(&candidates, &[b1]));
        assert_ne!(f1, fingerprint(&cands(&["B", "A"]), &[]));
    }

    #[test]
    fn score_display() {
        assert_eq!(Score::from_half_points(0).to_string(), "0");
        assert_eq!(Score::from_half_points(3).to_string(), "1.5");
        assert_eq!(Score::from_half_points(8).to_string(), "4");
    }

    // ***** Properties over generated polls *****

    // Small deterministic generator, enough to explore many shapes of polls.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> u64 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            self.0 >> 33
        }

        fn below(&mut self, n: u64) -> usize {
            (self.next() % n) as usize
        }
    }

    const NAMES: [&str; 6] = ["Alice", "Bob", "Carol", "Dave", "Erin", "Frank"];

    fn random_poll(seed: u64) -> (Vec<Candidate>, Vec<Ballot>) {
        let mut rng = Lcg(seed);
        let num_candidates = rng.below(NAMES.len() as u64 + 1);
        let candidates = cands(&NAMES[..num_candidates]);
        let num_ballots = rng.below(12);
        let mut ballots: Vec<Ballot> = Vec::new();
        for i in 0..num_ballots {
            let mut names: Vec<&str> = NAMES[..num_candidates].to_vec();
            for j in (1..names.len()).rev() {
                let k = rng.below(j as u64 + 1);
                names.swap(j, k);
            }
            names.truncate(rng.below(num_candidates as u64 + 1));
            ballots.push(ballot(&format!("b{}", i), &names));
        }
        (candidates, ballots)
    }

    fn check_properties(candidates: &[Candidate], ballots: &[Ballot], rules: &TabulationRules) {
        let res = run_copeland(candidates, ballots, rules);
        let n = candidates.len();

        // Every candidate appears exactly once.
        let mut seen: Vec<String> = res
            .tiers
            .iter()
            .flat_map(|t| t.candidates.iter().map(|c| c.name.clone()))
            .collect();
        seen.sort();
        let mut expected: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
        expected.sort();
        assert_eq!(seen, expected);

        // Scores are bounded, strictly decreasing, with competition ranks.
        let mut ahead: u32 = 0;
        for (idx, t) in res.tiers.iter().enumerate() {
            assert!(t.score.half_points() as usize <= 2 * n.saturating_sub(1));
            assert!(!t.candidates.is_empty());
            assert_eq!(t.rank, ahead + 1);
            if idx > 0 {
                assert!(res.tiers[idx - 1].score > t.score);
            }
            ahead += t.candidates.len() as u32;
        }

        // Each contest has one outcome, seen the same way from both sides.
        let contests = pairwise_contests(candidates, ballots, rules);
        assert_eq!(contests.len(), n * n.saturating_sub(1) / 2);
        let find = |name: &str| -> &CandidateResult {
            res.tiers
                .iter()
                .flat_map(|t| t.candidates.iter())
                .find(|c| c.name == name)
                .unwrap()
        };
        for c in contests.iter() {
            let a = find(&c.candidate_a);
            let b = find(&c.candidate_b);
            let a_beats_b = a.victories.iter().find(|v| v.opponent == c.candidate_b);
            let b_beats_a = b.victories.iter().find(|v| v.opponent == c.candidate_a);
            match c.outcome() {
                ContestOutcome::Win(w) if w == c.candidate_a => {
                    let v = a_beats_b.unwrap();
                    assert_eq!((v.votes_for_self, v.votes_for_opponent), (c.votes_for_a, c.votes_for_b));
                    assert!(b_beats_a.is_none());
                }
                ContestOutcome::Win(_) => {
                    let v = b_beats_a.unwrap();
                    assert_eq!((v.votes_for_self, v.votes_for_opponent), (c.votes_for_b, c.votes_for_a));
                    assert!(a_beats_b.is_none());
                }
                ContestOutcome::Tie => {
                    assert!(a_beats_b.is_none());
                    assert!(b_beats_a.is_none());
                }
            }
        }

        // The columns of the audit table are exactly the beaten candidates.
        let mut beaten: Vec<String> = res
            .tiers
            .iter()
            .flat_map(|t| t.candidates.iter())
            .flat_map(|c| c.victories.iter().map(|v| v.opponent.clone()))
            .collect();
        beaten.sort();
        beaten.dedup();
        let mut defeated = res.defeated_candidates.clone();
        defeated.sort();
        assert_eq!(beaten, defeated);

        // Stable output, independent of the order of the ballots.
        assert_eq!(res, run_copeland(candidates, ballots, rules));
        let mut shuffled = ballots.to_vec();
        shuffled.reverse();
        if !shuffled.is_empty() {
            shuffled.rotate_left(1);
        }
        assert_eq!(res, run_copeland(candidates, &shuffled, rules));
    }

    #[test]
    fn properties_hold_on_generated_polls() {
        init();
        let all_rules = [
            TabulationRules::DEFAULT_RULES,
            TabulationRules {
                tiebreak_mode: TieBreakMode::Alphabetical,
                unranked_mode: UnrankedCandidateMode::Abstain,
            },
        ];
        for seed in 0..200 {
            let (candidates, ballots) = random_poll(seed);
            for rules in all_rules.iter() {
                check_properties(&candidates, &ballots, rules);
            }
        }
    }
}
