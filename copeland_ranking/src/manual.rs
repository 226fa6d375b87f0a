/*!

This is the long-form manual for `copeland_ranking` and `pickypoll`.

## Method

Every pair of candidates is compared head-to-head. A ballot prefers `A` over `B` when it
ranks `A` before `B`, or when it ranks `A` and does not rank `B` at all: a candidate left
out of a ballot is considered less preferred than every candidate on it. A ballot that
ranks neither `A` nor `B` does not take part in this contest.

The candidate with more ballots in its favour wins the contest. Equal counts (including
`0:0`) are a tie. The score of a candidate is its number of wins plus half its number of
ties. Candidates are then sorted by decreasing score. Candidates with the same score
share a rank, and the next rank skips accordingly (scores `3, 1.5, 1.5, 0` give ranks
`1, 2, 2, 4`).

## Rules

| Option               | Values                                   | Default              |
|----------------------|------------------------------------------|----------------------|
| `tiebreakMode`       | `useCandidateOrder`, `alphabetical`      | `useCandidateOrder`  |
| `unrankedCandidates` | `leastPreferred`, `abstain`              | `leastPreferred`     |

- `tiebreakMode` only controls the order in which candidates of the same rank are
  listed. It never changes a rank.
- `unrankedCandidates = abstain` changes the method: a ballot only counts in the contests
  between two candidates it ranks. This matters for polls where write-in candidates
  were added after some ballots were cast.

## Input formats

The following formats are supported by `pickypoll`:
* `json` a JSON array of ballots
* `csv` Comma Separated Values, one ballot per line
* `xlsx` Excel spreadsheet, one ballot per row

### `json`

```text
[
  {"id": "b1", "name": "Ann", "rankings": ["Pizza", "Tacos"], "timestamp": 1660000000000},
  {"id": "b2", "name": "Bo", "rankings": ["Tacos"]}
]
```

`id`, `name` and `timestamp` are optional.

### `csv` and `xlsx`

```text
id,name,choice 1,choice 2,choice 3
b1,Ann,Pizza,Tacos,
b2,Bo,Tacos,,
```

Each cell starting from `firstVoteColumnIndex` is a choice, in order. Empty cells are
skipped. See the [Configuration section](#configuration) for the optional columns.

## Configuration

`pickypoll` accepts a configuration file in JSON:

```text
{
  "outputSettings": { "pollName": "Lunch", "outputDirectory": "out" },
  "ballotSources": [
    { "provider": "csv", "filePath": "ballots.csv", "firstVoteRowIndex": 2,
      "idColumnIndex": 1, "nameColumnIndex": 2, "firstVoteColumnIndex": 3 }
  ],
  "candidates": [ { "name": "Pizza" }, { "name": "Tacos", "description": "Food truck" } ],
  "rules": { "tiebreakMode": "useCandidateOrder", "unrankedCandidates": "leastPreferred" }
}
```

All the indices start at 1. File paths are relative to the directory of the
configuration file.

Options for ballot sources:
 - `provider` (string): one of `json`, `csv`, `xlsx`.
 - `idColumnIndex` (number, optional): the column with the ballot ids. If not provided,
   ids are generated from the file name and the line number.
 - `nameColumnIndex` (number, optional): the column with the names of the voters.
 - `timestampColumnIndex` (number, optional): the column with the submission times, in
   milliseconds.
 - `firstVoteColumnIndex` (number, optional, default 1): the first column of choices.
 - `firstVoteRowIndex` (number, optional, default 1): the first row with a ballot.
 - `excelWorksheetName` (string, optional): for Excel inputs, the name of the worksheet.
   The first worksheet is used otherwise.

 */
