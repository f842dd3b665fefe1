extern crate flate2;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

pub mod chart;
pub mod configuration;
pub mod defs;
pub mod engine;
pub mod error;
pub mod output;
pub mod survey;

use std::io::Read;

pub use crate::error::{Error, Result};

use crate::configuration::SurveyConfig;
use crate::defs::Aggregate;
use crate::survey::data::responses;

// the whole aggregate pass: read everything, parse it, count it.
// nothing is emitted unless all of it succeeds
pub fn aggregate_survey<R: Read>(reader: R, config: &SurveyConfig) -> Result<Aggregate> {
    let input = responses::read_input(reader)?;
    let rows = responses::parse(&input)?;
    Ok(engine::aggregate(config, &rows))
}
