use num_format::{Locale, ToFormattedString};

use crate::configuration::SurveyConfig;
use crate::defs::*;
use crate::survey::data::responses::{parse_age, SurveyRow};

#[derive(Debug, PartialEq, Eq)]
pub enum RowOutcome {
    // the row's age could not be read; nothing was counted
    Skipped,
    // number of candy fields that held a rating
    Counted(usize),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregateStats {
    pub rows_counted: u32,
    pub rows_skipped: u32,
    pub votes: u32,
    pub fields_ignored: u32,
}

pub struct AggregateEngine<'a> {
    config: &'a SurveyConfig,
    aggregate: Aggregate,
    stats: AggregateStats,
}

impl<'a> AggregateEngine<'a> {
    // every configured candy is present from the start, so candies
    // nobody rated still show up with zero counts
    pub fn new(config: &'a SurveyConfig) -> AggregateEngine<'a> {
        let aggregate = config
            .candies
            .iter()
            .map(|(_, name)| (name.clone(), CandyTally::new(&config.age_brackets)))
            .collect();
        AggregateEngine {
            config,
            aggregate,
            stats: AggregateStats::default(),
        }
    }

    pub fn add_row(&mut self, row: &SurveyRow) -> RowOutcome {
        let config = self.config;
        let age = match row.get(&config.age_field).and_then(|v| parse_age(v)) {
            Some(age) => age,
            None => {
                self.stats.rows_skipped += 1;
                return RowOutcome::Skipped;
            }
        };
        let bracket = match config.bracket_for(age) {
            Some(b) => b.name.as_str(),
            None => {
                // validated configs tile every age, so this only happens
                // with a hand-built SurveyConfig
                warn!("no age bracket contains {}, skipping row", age);
                self.stats.rows_skipped += 1;
                return RowOutcome::Skipped;
            }
        };

        let mut counted = 0;
        for (field, name) in &config.candies {
            let rating = match row.get(field).and_then(|v| Rating::parse(v)) {
                Some(r) => r,
                None => {
                    self.stats.fields_ignored += 1;
                    continue;
                }
            };
            if let Some(tally) = self.aggregate.get_mut(name) {
                tally.record(bracket, rating);
                counted += 1;
            }
        }
        self.stats.rows_counted += 1;
        self.stats.votes += counted as u32;
        RowOutcome::Counted(counted)
    }

    pub fn add_rows(&mut self, rows: &[SurveyRow]) {
        let total = rows.len();
        for (idx, row) in rows.iter().enumerate() {
            info!("processing row {} of {}", idx + 1, total);
            self.add_row(row);
        }
    }

    pub fn stats(&self) -> &AggregateStats {
        &self.stats
    }

    pub fn print_debug(&self) {
        debug!("-- AggregateEngine::print_debug --");
        debug!("Candies: {}", self.aggregate.len());
        debug!("Rows counted: {}", self.stats.rows_counted.to_formatted_string(&Locale::en));
        debug!("Rows skipped: {}", self.stats.rows_skipped.to_formatted_string(&Locale::en));
        debug!("Votes counted: {}", self.stats.votes.to_formatted_string(&Locale::en));
        debug!("Fields ignored: {}", self.stats.fields_ignored.to_formatted_string(&Locale::en));
    }

    pub fn finish(self) -> Aggregate {
        self.aggregate
    }
}

pub fn aggregate(config: &SurveyConfig, rows: &[SurveyRow]) -> Aggregate {
    let mut engine = AggregateEngine::new(config);
    engine.add_rows(rows);
    engine.print_debug();
    engine.finish()
}
