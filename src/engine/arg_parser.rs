use clap::Parser;
use std::path::PathBuf;

use crate::Opts;

/// Lists S3 objects and posts S3 notifications to the log processor SNS topic.
///
/// Every flag can also be set in `.s3replay.toml` under `[settings]`; flags given here win.
#[derive(Clone, Debug, Default, Parser)]
#[command(name = "s3replay")]
#[command(about = "List S3 objects and post S3 notifications to the log processor SNS topic.")]
pub struct Cli {
    /// AWS region where the topic exists. Default: region from the AWS environment/profile.
    #[arg(long)]
    pub region: Option<String>,

    /// AWS account id that owns the topic. Default: account of the current credentials.
    #[arg(long)]
    pub account: Option<String>,

    /// S3 path to list, e.g. s3://<bucket>/<prefix>.
    #[arg(long, value_name = "S3_PATH")]
    pub s3path: Option<String>,

    /// Number of concurrent publish workers. Default: 50.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub concurrency: Option<usize>,

    /// If non-zero, stop after this many files. Default: 0 (no limit).
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub limit: Option<u64>,

    /// Name of the log processor topic to send notifications to.
    /// Default: panther-processed-data-notifications.
    #[arg(long)]
    pub topic: Option<String>,

    /// Prompt for required values that are not set. Default: true.
    #[arg(long, short = 'i', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub interactive: Option<bool>,

    /// Verbose output: debug logging and a progress counter.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Config file. Default: `.s3replay.toml` in the working directory, if present.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Overwrite opts with every flag the user actually passed.
    pub fn apply_to_opts(&self, opts: &mut Opts) {
        if let Some(r) = &self.region {
            opts.region = Some(r.clone());
        }
        if let Some(a) = &self.account {
            opts.account = Some(a.clone());
        }
        if let Some(p) = &self.s3path {
            opts.s3_path = Some(p.clone());
        }
        if let Some(t) = &self.topic {
            opts.topic = Some(t.clone());
        }
        if let Some(n) = self.concurrency {
            opts.concurrency = n;
        }
        if let Some(l) = self.limit {
            opts.limit = l;
        }
        if let Some(i) = self.interactive {
            opts.interactive = i;
        }
        if let Some(v) = self.verbose {
            opts.verbose = v;
        }
    }
}
