use itertools::Itertools;

use crate::defs::Rating;
use crate::error::{Error, Result};

// stacking order of the bar segments, leftmost first
pub type RatingOrder = [Rating; 3];

pub const DEFAULT_ORDER: RatingOrder = [Rating::Joy, Rating::Meh, Rating::Despair];

pub fn parse_order(s: &str) -> Result<RatingOrder> {
    let ratings: Vec<Rating> = s
        .split(',')
        .map(|part| Rating::parse(part.trim()))
        .collect::<Option<Vec<Rating>>>()
        .ok_or_else(|| Error::InvalidOrder(s.to_string()))?;
    if ratings.len() != 3 || !Rating::ALL.iter().all(|r| ratings.contains(r)) {
        return Err(Error::InvalidOrder(s.to_string()));
    }
    Ok([ratings[0], ratings[1], ratings[2]])
}

pub fn order_key(order: &RatingOrder) -> String {
    order.iter().map(|r| r.name()).join(",")
}
