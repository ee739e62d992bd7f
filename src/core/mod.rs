pub mod protocol;
pub mod survey;
pub mod types;
