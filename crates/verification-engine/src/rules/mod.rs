pub mod alignment;
pub mod confidence;
pub mod keywords;
