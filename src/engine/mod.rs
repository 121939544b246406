//! Engine module: command-line surface around the pipeline

pub mod arg_parser;
pub mod cli;
pub mod progress;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{build_opts, handle_run, report_outcome};
pub use progress::{ProgressBar, create_counter, progress_callback};
