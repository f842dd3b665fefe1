pub mod candies;
pub mod responses;
