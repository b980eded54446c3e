// Adapters layer: turn spreadsheet-like files into domain types and back.

pub mod output;
pub mod roster;
pub mod table;

pub use output::OutputFormat;
pub use roster::{parse_participants, parse_prior_assignments};
pub use table::{Table, TableFormat};
