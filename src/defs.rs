/*
 * core types
 */

use std::collections::BTreeMap;
use std::fmt;

// a respondent's feeling about a candy; the survey only
// offers these three answers
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Rating {
    Joy,
    Meh,
    Despair,
}

impl Rating {
    pub const ALL: [Rating; 3] = [Rating::Joy, Rating::Meh, Rating::Despair];

    pub fn name(self) -> &'static str {
        match self {
            Rating::Joy => "joy",
            Rating::Meh => "meh",
            Rating::Despair => "despair",
        }
    }

    // raw answers arrive as "JOY", "Joy", etc. anything that isn't
    // one of the three ratings after lower-casing is not a vote
    pub fn parse(raw: &str) -> Option<Rating> {
        match raw.to_lowercase().as_str() {
            "joy" => Some(Rating::Joy),
            "meh" => Some(Rating::Meh),
            "despair" => Some(Rating::Despair),
            _ => None,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Rating::Joy => "#96ea98",
            Rating::Meh => "#aaaaaa",
            Rating::Despair => "#d65959",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct RatingCounts {
    #[serde(default)]
    pub joy: u32,
    #[serde(default)]
    pub meh: u32,
    #[serde(default)]
    pub despair: u32,
}

impl RatingCounts {
    pub fn new() -> RatingCounts {
        RatingCounts::default()
    }

    pub fn get(&self, rating: Rating) -> u32 {
        match rating {
            Rating::Joy => self.joy,
            Rating::Meh => self.meh,
            Rating::Despair => self.despair,
        }
    }

    pub fn increment(&mut self, rating: Rating) {
        match rating {
            Rating::Joy => self.joy += 1,
            Rating::Meh => self.meh += 1,
            Rating::Despair => self.despair += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.joy + self.meh + self.despair
    }
}

// half-open age range [minimum, maximum); a missing bound is unbounded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBracket {
    pub name: String,
    #[serde(default)]
    pub minimum: Option<i64>,
    #[serde(default)]
    pub maximum: Option<i64>,
}

impl AgeBracket {
    pub fn new(name: &str, minimum: Option<i64>, maximum: Option<i64>) -> AgeBracket {
        AgeBracket {
            name: name.to_string(),
            minimum,
            maximum,
        }
    }

    pub fn contains(&self, age: i64) -> bool {
        let above_minimum = self.minimum.map_or(true, |minimum| minimum <= age);
        let below_maximum = self.maximum.map_or(true, |maximum| age < maximum);
        above_minimum && below_maximum
    }
}

// everything we know about one candy: the overall tally, and the same
// tally split up by the respondent's age bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandyTally {
    pub totals: RatingCounts,
    pub ages: BTreeMap<String, RatingCounts>,
}

impl CandyTally {
    pub fn new(brackets: &[AgeBracket]) -> CandyTally {
        CandyTally {
            totals: RatingCounts::new(),
            ages: brackets
                .iter()
                .map(|bracket| (bracket.name.clone(), RatingCounts::new()))
                .collect(),
        }
    }

    // a vote always lands in the totals and in exactly one bracket,
    // so the two views can never drift apart
    pub fn record(&mut self, bracket: &str, rating: Rating) {
        self.totals.increment(rating);
        self.ages
            .entry(bracket.to_string())
            .or_insert_with(RatingCounts::new)
            .increment(rating);
    }
}

// keyed by candy display name; BTreeMap so that the emitted JSON is
// identical from run to run
pub type Aggregate = BTreeMap<String, CandyTally>;
