//
// The renderer's view of data.json: one record per candy.
//
// data.json comes in two shapes, the aggregate written by `aggregate`
// (a map of candy -> totals and per-bracket counts) and a flat array of
// {name, ratings, total}. Both end up as ChartRecords, which is also what
// the page binds to its charts.
//

use std::fs::File;
use std::io::Read;
use std::path::Path;

use itertools::Itertools;

use crate::defs::{AgeBracket, Aggregate, RatingCounts};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGroup {
    pub name: String,
    pub ratings: RatingCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRecord {
    pub name: String,
    pub ratings: RatingCounts,
    pub total: u32,
    // only the aggregate shape carries the age breakdown, in bracket order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ages: Option<Vec<AgeGroup>>,
}

#[derive(Debug, Deserialize)]
struct FlatRecord {
    name: String,
    ratings: RatingCounts,
    #[serde(default)]
    total: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataFile {
    Records(Vec<FlatRecord>),
    Aggregate(Aggregate),
}

// the json map loses bracket order, so put it back: configured brackets
// first in their configured order, then any labels we don't know by name
fn bracket_rank(brackets: &[AgeBracket], label: &str) -> usize {
    brackets
        .iter()
        .position(|b| b.name == label)
        .unwrap_or_else(|| brackets.len())
}

pub fn records_from_aggregate(aggregate: &Aggregate, brackets: &[AgeBracket]) -> Vec<ChartRecord> {
    aggregate
        .iter()
        .map(|(name, tally)| ChartRecord {
            name: name.clone(),
            ratings: tally.totals,
            total: tally.totals.total(),
            ages: Some(
                tally
                    .ages
                    .iter()
                    .sorted_by_key(|(label, _)| bracket_rank(brackets, label))
                    .map(|(label, ratings)| AgeGroup {
                        name: label.clone(),
                        ratings: *ratings,
                    })
                    .collect(),
            ),
        })
        .collect()
}

pub fn parse_data(input: &[u8], brackets: &[AgeBracket]) -> Result<Vec<ChartRecord>> {
    let data: DataFile = serde_json::from_slice(input)?;
    let records = match data {
        DataFile::Aggregate(aggregate) => records_from_aggregate(&aggregate, brackets),
        DataFile::Records(flat) => flat
            .into_iter()
            .map(|r| ChartRecord {
                total: r.total.unwrap_or_else(|| r.ratings.total()),
                name: r.name,
                ratings: r.ratings,
                ages: None,
            })
            .collect(),
    };
    Ok(records)
}

pub fn load<P: AsRef<Path>>(filename: P, brackets: &[AgeBracket]) -> Result<Vec<ChartRecord>> {
    let mut fd = File::open(filename)?;
    let mut buf = Vec::new();
    fd.read_to_end(&mut buf)?;
    parse_data(&buf, brackets)
}
