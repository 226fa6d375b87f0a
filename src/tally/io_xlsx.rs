use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::tally::{
    io_common::{make_default_id, parse_timestamp},
    *,
};

pub fn read_xlsx_ranking(path: &str, cfs: &BallotSource) -> PollResult<Vec<ParsedBallot>> {
    let default_id = make_default_id(path);

    let id_idx_o = cfs.id_column_index()?;
    let name_idx_o = cfs.name_column_index()?;
    let timestamp_idx_o = cfs.timestamp_column_index()?;
    let choices_start_col = cfs.first_vote_column_index()?;
    let first_row = cfs.first_vote_row_index()?;

    let wrange = get_range(path, cfs)?;

    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, row) in wrange.rows().enumerate().skip(first_row - 1) {
        let lineno = idx + 1;
        debug!("read_xlsx_ranking: lineno: {:?} row: {:?}", lineno, row);
        let cell = |col: usize| -> PollResult<String> {
            match row.get(col) {
                Some(c) => read_cell(c, lineno),
                None => Ok("".to_string()),
            }
        };

        let id = match id_idx_o {
            Some(id_idx) => cell(id_idx)?,
            None => default_id(lineno),
        };
        let name = match name_idx_o {
            Some(name_idx) => Some(cell(name_idx)?),
            None => None,
        };
        let timestamp = match timestamp_idx_o {
            Some(ts_idx) => parse_timestamp(&cell(ts_idx)?, lineno)?,
            None => None,
        };

        let mut choices: Vec<String> = Vec::new();
        for c in row.iter().skip(choices_start_col) {
            choices.push(read_cell(c, lineno)?);
        }

        res.push(ParsedBallot {
            id,
            name,
            timestamp,
            choices,
        });
    }
    Ok(res)
}

fn get_range(path: &str, cfs: &BallotSource) -> PollResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match &cfs.excel_worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?,
    };
    wrange.context(OpeningExcelSnafu { path })
}

fn read_cell(cell: &DataType, lineno: usize) -> PollResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Empty => Ok("".to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        // Numbers typed in a spreadsheet come out as floats.
        DataType::Float(f) if f.fract() == 0.0 => Ok(format!("{}", *f as i64)),
        DataType::Float(f) => Ok(f.to_string()),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}
