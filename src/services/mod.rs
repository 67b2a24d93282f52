// Service exports
pub mod csv_source;
pub mod ingest;
pub mod report;
pub mod session;

pub use csv_source::{ColumnSelector, CsvSource, HeaderMode, IngestError};
pub use ingest::{ingest, CellPair, Ingested, RawCoordinate};
pub use report::{render_matches, render_rejected, render_summary};
pub use session::{run_prompt_loop, DuplicatePolicy, EntryOutcome, PromptSession};
