pub mod html;
pub mod order;
pub mod records;
