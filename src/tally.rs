use log::{debug, info, warn};

use copeland_ranking::*;
use snafu::{prelude::*, Snafu};

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::tally::config_reader::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_json;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum PollError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("No worksheet named {name} in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Line {lineno}: cannot read cell {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading a CSV line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Line {lineno}: no column {column}"))]
    CsvLineTooShort { lineno: usize, column: usize },
    #[snafu(display("Line {lineno}: {content} is not a timestamp"))]
    ParsingTimestamp { lineno: usize, content: String },
    #[snafu(display("Error reading file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected an index starting at 1, got {content}"))]
    ParsingJsonNumber { content: String },
    #[snafu(display("Error writing file {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type PollResult<T> = Result<T, PollError>;

/// A ballot, as parsed by the readers
/// This is before dropping the blank choices.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: String,
    pub name: Option<String>,
    pub timestamp: Option<u64>,
    pub choices: Vec<String>,
}

fn result_to_json(rs: &CopelandResult) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for tier in rs.tiers.iter() {
        let mut candidates: Vec<JSValue> = Vec::new();
        for cand in tier.candidates.iter() {
            let wins: Vec<JSValue> = cand
                .victories
                .iter()
                .map(|v| {
                    json!({
                        "competitor": v.opponent,
                        "votes": v.votes_for_self,
                        "competitorVotes": v.votes_for_opponent
                    })
                })
                .collect();
            candidates.push(json!({"candidate": cand.name, "wins": wins}));
        }
        l.push(json!({"rank": tier.rank, "score": tier.score.as_f64(), "candidates": candidates}));
    }
    l
}

fn build_summary_js(
    settings: &OutputSettings,
    candidates: &[Candidate],
    ballots: &[Ballot],
    rs: &CopelandResult,
) -> JSValue {
    let c = OutputConfig {
        poll: settings.poll_name.clone(),
        description: settings.poll_description.clone(),
        num_ballots: ballots.len(),
        num_candidates: candidates.len(),
        fingerprint: fingerprint(candidates, ballots),
    };
    let warnings: Vec<String> = rs.warnings.iter().map(|w| w.to_string()).collect();
    json!({
        "config": c,
        "results": result_to_json(rs),
        "defeatedCandidates": rs.defeated_candidates,
        "warnings": warnings
    })
}

/// Renders the pairwise comparison table: one row per candidate, one column per
/// candidate that lost at least one contest. A cell holds the votes of a won contest.
fn render_audit_table(rs: &CopelandResult) -> String {
    if rs.is_empty() {
        return "No ranking yet: the poll has no candidates.".to_string();
    }
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut header = vec!["Rank".to_string(), "Score".to_string(), "".to_string()];
    header.extend(rs.defeated_candidates.iter().cloned());
    rows.push(header);
    for tier in rs.tiers.iter() {
        for (idx, cand) in tier.candidates.iter().enumerate() {
            // Rank and score are only shown on the first row of a tier.
            let mut row = if idx == 0 {
                vec![tier.rank.to_string(), tier.score.to_string()]
            } else {
                vec!["".to_string(), "".to_string()]
            };
            row.push(cand.name.clone());
            for competitor in rs.defeated_candidates.iter() {
                let content = cand
                    .victories
                    .iter()
                    .find(|v| v.opponent == *competitor)
                    .map(|v| format!("{}:{}", v.votes_for_self, v.votes_for_opponent))
                    .unwrap_or_default();
                row.push(content);
            }
            rows.push(row);
        }
    }

    let widths: Vec<usize> = (0..rows[0].len())
        .map(|col| rows.iter().map(|r| r[col].chars().count()).max().unwrap_or(0))
        .collect();
    rows.iter()
        .map(|r| {
            let cells: Vec<String> = r
                .iter()
                .zip(widths.iter())
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect();
            cells.join(" | ").trim_end().to_string()
        })
        .collect::<Vec<String>>()
        .join("\n")
}

fn read_ranking_data(root_path: &Path, cfs: &BallotSource) -> PollResult<Vec<ParsedBallot>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read ballot file {:?}", p2);
    let parsed_ballots = match cfs.provider.as_str() {
        "json" => io_json::read_json_ballots(&p2)?,
        "csv" => io_csv::read_csv_ranking(&p2, cfs)?,
        "xlsx" => io_xlsx::read_xlsx_ranking(&p2, cfs)?,
        x => whatever!("Provider not implemented {:?}", x),
    };
    info!(
        "read_ranking_data: {} ballots read from {:?}",
        parsed_ballots.len(),
        p2
    );
    Ok(parsed_ballots)
}

fn validate_ballots(parsed_ballots: &[ParsedBallot]) -> Vec<Ballot> {
    let mut res: Vec<Ballot> = Vec::new();
    for pb in parsed_ballots.iter() {
        let rankings: Vec<String> = pb
            .choices
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        let id = pb.id.clone();
        debug!("Rankings for ballot {:?}: {:?}", id, rankings);
        if rankings.is_empty() {
            warn!("validate_ballots: ballot {} does not rank any candidate", id);
        }
        res.push(Ballot {
            id,
            name: pb.name.clone().unwrap_or_default(),
            rankings,
            timestamp: pb.timestamp,
        });
    }
    res
}

/// The candidates in the order they first appear on the ballots.
fn infer_candidates(ballots: &[Ballot]) -> Vec<Candidate> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut res: Vec<Candidate> = Vec::new();
    for name in ballots.iter().flat_map(|b| b.rankings.iter()) {
        if seen.insert(name.as_str()) {
            res.push(Candidate::new(name));
        }
    }
    res
}

/// Names are trimmed the same way as the ballot choices.
fn validate_candidates(declared: Vec<Candidate>) -> PollResult<Vec<Candidate>> {
    let mut res: Vec<Candidate> = Vec::new();
    for (idx, c) in declared.into_iter().enumerate() {
        let name = c.name.trim();
        if name.is_empty() {
            whatever!("Candidate #{} has an empty name", idx + 1)
        }
        res.push(Candidate {
            name: name.to_string(),
            description: c.description,
        });
    }
    Ok(res)
}

fn validate_rules(poll_rules: Option<&PollRules>) -> PollResult<TabulationRules> {
    let mut rules = TabulationRules::DEFAULT_RULES;
    let poll_rules = match poll_rules {
        Some(r) => r,
        None => return Ok(rules),
    };
    rules.tiebreak_mode = match poll_rules.tiebreak_mode.as_deref() {
        None | Some("useCandidateOrder") => TieBreakMode::UseCandidateOrder,
        Some("alphabetical") => TieBreakMode::Alphabetical,
        Some(x) => {
            whatever!("Cannot use tiebreak mode {:?} (not implemented)", x)
        }
    };
    rules.unranked_mode = match poll_rules.unranked_candidates.as_deref() {
        None | Some("leastPreferred") => UnrankedCandidateMode::LeastPreferred,
        Some("abstain") => UnrankedCandidateMode::Abstain,
        Some(x) => {
            whatever!("Cannot treat unranked candidates as {:?} (not implemented)", x)
        }
    };
    Ok(rules)
}

fn write_summary(path: &Path, contents: &str) -> PollResult<()> {
    let display = path.display().to_string();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context(WritingSummarySnafu {
            path: display.clone(),
        })?;
    }
    fs::write(path, contents).context(WritingSummarySnafu { path: display })?;
    info!("Summary written to {}", path.display());
    Ok(())
}

pub fn run_poll(args: &Args) -> PollResult<()> {
    let config: Option<PollConfig> = match &args.config {
        Some(p) => Some(read_config(p)?),
        None => None,
    };
    let config_root: PathBuf = match &args.config {
        Some(p) => Path::new(p)
            .parent()
            .context(MissingParentDirSnafu {})?
            .to_path_buf(),
        None => PathBuf::new(),
    };
    info!("config: {:?}", config);

    // Validate the rules:
    let rules = validate_rules(config.as_ref().and_then(|c| c.rules.as_ref()))?;

    // An explicit input file is relative to the current directory.
    let (sources, sources_root): (Vec<BallotSource>, PathBuf) = match (&args.input, &config) {
        (Some(input), _) => (
            vec![BallotSource::from_input(
                input,
                args.input_type.clone(),
                args.excel_worksheet_name.clone(),
            )],
            PathBuf::new(),
        ),
        (None, Some(c)) if !c.ballot_sources.is_empty() => {
            (c.ballot_sources.clone(), config_root.clone())
        }
        _ => whatever!("No ballots to read: use --input or add ballotSources to the configuration"),
    };

    let mut parsed: Vec<ParsedBallot> = Vec::new();
    for cfs in sources.iter() {
        let mut file_data = read_ranking_data(&sources_root, cfs)?;
        parsed.append(&mut file_data);
    }
    let ballots = validate_ballots(&parsed);

    let declared: Vec<Candidate> = match (&args.candidates, &config) {
        (Some(names), _) => names.iter().map(|n| Candidate::new(n)).collect(),
        (None, Some(c)) if !c.candidates.is_empty() => c
            .candidates
            .iter()
            .map(|pc| Candidate {
                name: pc.name.clone(),
                description: match pc.description.clone() {
                    Some(x) if x.is_empty() => None,
                    x => x,
                },
            })
            .collect(),
        _ => infer_candidates(&ballots),
    };
    let candidates = validate_candidates(declared)?;

    let settings: OutputSettings = match &config {
        Some(c) => c.output_settings.clone(),
        None => OutputSettings {
            poll_name: args
                .input
                .as_deref()
                .map(io_common::simplify_file_name)
                .unwrap_or_else(|| "poll".to_string()),
            poll_description: None,
            output_directory: None,
        },
    };

    let result = run_copeland(&candidates, &ballots, &rules);

    // Assemble the final json
    let result_js = build_summary_js(&settings, &candidates, &ballots, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match args.out.as_deref() {
        Some("stdout") => println!("{}", pretty_js_stats),
        Some(out_path) => {
            println!("{}", render_audit_table(&result));
            write_summary(Path::new(out_path), &pretty_js_stats)?;
        }
        None => {
            println!("{}", render_audit_table(&result));
            if let Some(dir) = &settings.output_directory {
                let file_name = format!("{}_summary.json", settings.poll_name);
                write_summary(&config_root.join(dir).join(file_name), &pretty_js_stats)?;
            }
        }
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        let summary_ref = read_summary(summary_p)?;
        info!("summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}
