pub mod formatter;
pub mod report;
pub mod table;
pub mod writer;
