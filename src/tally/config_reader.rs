use crate::tally::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "pollName")]
    pub poll_name: String,
    #[serde(rename = "pollDescription")]
    pub poll_description: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub poll: String,
    pub description: Option<String>,
    #[serde(rename = "numBallots")]
    pub num_ballots: usize,
    #[serde(rename = "numCandidates")]
    pub num_candidates: usize,
    pub fingerprint: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BallotSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "idColumnIndex")]
    _id_column_index: Option<JSValue>,
    #[serde(rename = "nameColumnIndex")]
    _name_column_index: Option<JSValue>,
    #[serde(rename = "timestampColumnIndex")]
    _timestamp_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteColumnIndex")]
    _first_vote_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteRowIndex")]
    _first_vote_row_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl BallotSource {
    /// A source built from the command line: every ballot row holds only choices.
    pub fn from_input(
        file_path: &str,
        provider: Option<String>,
        excel_worksheet_name: Option<String>,
    ) -> BallotSource {
        BallotSource {
            provider: provider.unwrap_or_else(|| "json".to_string()),
            file_path: file_path.to_string(),
            _id_column_index: None,
            _name_column_index: None,
            _timestamp_column_index: None,
            _first_vote_column_index: None,
            _first_vote_row_index: None,
            excel_worksheet_name,
        }
    }

    // All the column accessors return 0-based indices.

    pub fn id_column_index(&self) -> PollResult<Option<usize>> {
        Ok(read_js_int(&self._id_column_index)?.map(|x| x - 1))
    }

    pub fn name_column_index(&self) -> PollResult<Option<usize>> {
        Ok(read_js_int(&self._name_column_index)?.map(|x| x - 1))
    }

    pub fn timestamp_column_index(&self) -> PollResult<Option<usize>> {
        Ok(read_js_int(&self._timestamp_column_index)?.map(|x| x - 1))
    }

    pub fn first_vote_column_index(&self) -> PollResult<usize> {
        Ok(read_js_int(&self._first_vote_column_index)?.unwrap_or(1) - 1)
    }

    /// 1-based, as in spreadsheets.
    pub fn first_vote_row_index(&self) -> PollResult<usize> {
        Ok(read_js_int(&self._first_vote_row_index)?.unwrap_or(1))
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PollCandidate {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PollRules {
    #[serde(rename = "tiebreakMode")]
    pub tiebreak_mode: Option<String>,
    #[serde(rename = "unrankedCandidates")]
    pub unranked_candidates: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "ballotSources", default)]
    pub ballot_sources: Vec<BallotSource>,
    #[serde(default)]
    pub candidates: Vec<PollCandidate>,
    pub rules: Option<PollRules>,
}

pub fn read_config(path: &str) -> PollResult<PollConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: PollConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> PollResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read content: {:?}", contents);
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

// Indices are positive: they start at 1.
fn read_js_int(x: &Option<JSValue>) -> PollResult<Option<usize>> {
    let res = match x {
        None | Some(JSValue::Null) => return Ok(None),
        Some(JSValue::Number(n)) => n.as_u64().map(|x| x as usize),
        Some(JSValue::String(s)) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    match res {
        Some(i) if i >= 1 => Ok(Some(i)),
        _ => ParsingJsonNumberSnafu {
            content: format!("{:?}", x),
        }
        .fail(),
    }
}
