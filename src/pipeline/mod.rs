//! Pipeline components: listing, publish workers, stats, and the orchestrator that wires them.
//!
//! Lister thread → bounded object channel → N publish workers → topic, with [`Stats`] updated
//! on the side.

pub mod context;
pub mod error_handler;
pub mod interrupt;
pub mod lister;
pub mod notification;
pub mod orchestrator;
pub mod stats;
pub mod workers;

pub use context::{PipelineChannels, ProgressFn, WorkerContext, create_pipeline_channels};
pub use error_handler::{FailureState, check_for_first_error};
pub use interrupt::install_interrupt_handler;
pub use lister::{ObjectIter, ObjectLister, run_listing_loop, spawn_listing_thread};
pub use notification::{S3EventNotification, build_notification, encode_notification};
pub use orchestrator::{Orchestrator, RunState, resolve_run_config, validate_opts};
pub use stats::Stats;
pub use workers::{publish_object, spawn_publish_workers};
