pub mod batch;
pub mod scorer;

pub use batch::{BatchSummary, run_batch, run_batch_files};
pub use scorer::Scorer;
