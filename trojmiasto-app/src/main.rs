use anyhow::Result;
use clap::Parser;
use trojmiasto_common::observability::{LogConfig, LogFormat, init_logging};
use trojmiasto_config::{LogEncoding, TrojmiastoConfigLoader};

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let args = Cli::parse();

    // 1) Load config (env wins)
    let mut loader = TrojmiastoConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_file(path);
    }
    let cfg = loader.load()?;

    init_logging(LogConfig {
        log_dir: cfg.log.dir.clone(),
        emit_stderr: cfg.log.stderr,
        format: match cfg.log.format {
            LogEncoding::Text => LogFormat::Text,
            LogEncoding::Json => LogFormat::Json,
        },
        filter: cfg.log_filter(),
        ..Default::default()
    })?;

    cli::run(args, &cfg)
}
