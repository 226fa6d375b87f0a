// Ballots exported as JSON, either as a list or wrapped in a "ballots" field.

use serde::Deserialize;

use crate::tally::{io_common::make_default_id, *};

#[derive(Debug, Clone, Deserialize)]
struct JsonBallot {
    id: Option<String>,
    name: Option<String>,
    #[serde(default)]
    rankings: Vec<String>,
    timestamp: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum JsonBallots {
    List(Vec<JsonBallot>),
    Wrapped { ballots: Vec<JsonBallot> },
}

pub fn read_json_ballots(path: &str) -> PollResult<Vec<ParsedBallot>> {
    let default_id = make_default_id(path);
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JsonBallots = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    let ballots = match js {
        JsonBallots::List(l) => l,
        JsonBallots::Wrapped { ballots } => ballots,
    };
    debug!("read_json_ballots: {} ballots in {}", ballots.len(), path);
    let res = ballots
        .into_iter()
        .enumerate()
        .map(|(idx, jb)| ParsedBallot {
            id: jb.id.unwrap_or_else(|| default_id(idx + 1)),
            name: jb.name,
            timestamp: jb.timestamp,
            choices: jb.rankings,
        })
        .collect();
    Ok(res)
}
