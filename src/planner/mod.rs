pub mod plan;
pub mod relationship;
pub mod resource;
