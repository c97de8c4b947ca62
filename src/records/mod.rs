pub mod file;
pub mod models;
pub mod provider;
pub mod table;

pub use file::JsonFileSource;
pub use models::{parse_match_date, records_from_values, MatchRecord, OddsField, RawMatchRecord};
pub use provider::MatchSource;
pub use table::ScrapedTable;
