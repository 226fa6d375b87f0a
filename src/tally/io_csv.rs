// Primitives for reading CSV files.

use std::fs::File;

use crate::tally::{
    io_common::{make_default_id, parse_timestamp},
    *,
};

pub fn read_csv_ranking(path: &str, cfs: &BallotSource) -> PollResult<Vec<ParsedBallot>> {
    let default_id = make_default_id(path);

    let id_idx_o = cfs.id_column_index()?;
    let name_idx_o = cfs.name_column_index()?;
    let timestamp_idx_o = cfs.timestamp_column_index()?;
    let choices_start_col = cfs.first_vote_column_index()?;

    let mut res: Vec<ParsedBallot> = Vec::new();
    let (records, first_row) = get_records(path, cfs)?;

    for (idx, line_r) in records.enumerate() {
        let lineno = idx + first_row;
        let line = line_r.context(CsvLineParseSnafu {})?;

        let id = match id_idx_o {
            Some(id_idx) => get_cell(&line, id_idx, lineno)?.to_string(),
            None => default_id(lineno),
        };
        let name = match name_idx_o {
            Some(name_idx) => Some(get_cell(&line, name_idx, lineno)?.to_string()),
            None => None,
        };
        let timestamp = match timestamp_idx_o {
            Some(ts_idx) => parse_timestamp(get_cell(&line, ts_idx, lineno)?, lineno)?,
            None => None,
        };

        let choices: Vec<String> = line
            .iter()
            .skip(choices_start_col)
            .map(|s| s.to_string())
            .collect();
        debug!("read_csv_ranking: lineno: {:?} row: {:?}", lineno, &choices);

        res.push(ParsedBallot {
            id,
            name,
            timestamp,
            choices,
        });
    }
    Ok(res)
}

fn get_cell(line: &csv::StringRecord, col: usize, lineno: usize) -> PollResult<&str> {
    line.get(col).context(CsvLineTooShortSnafu {
        lineno,
        column: col + 1,
    })
}

fn get_records(
    path: &str,
    cfs: &BallotSource,
) -> PollResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let first_row = cfs.first_vote_row_index()?;
    // Partial ballots may have fewer cells than the header.
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();
    // The index starts at 1 to respect most conventions in the excel world
    for _ in 1..first_row {
        _ = records.next();
    }
    Ok((records, first_row))
}
