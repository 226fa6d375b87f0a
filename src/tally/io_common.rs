use std::path::Path;

use crate::tally::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Empty cells are accepted: the submission time is optional.
pub fn parse_timestamp(content: &str, lineno: usize) -> PollResult<Option<u64>> {
    let s = content.trim();
    if s.is_empty() {
        return Ok(None);
    }
    let ts = s
        .parse::<u64>()
        .ok()
        .context(ParsingTimestampSnafu { lineno, content: s })?;
    Ok(Some(ts))
}
