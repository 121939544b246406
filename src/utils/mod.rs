pub mod config;
pub mod logger;
pub mod prompt;
pub mod replay_toml;

pub use config::*;
pub use logger::{crate_level, render_line, setup_logging};
pub use prompt::{load_dotenv, prompt_required, read_nonempty};
pub use replay_toml::{ReplayToml, apply_file_to_opts, load_replay_toml, parse_replay_toml};
