mod compare;
mod config;
mod errors;
mod ingest;
mod logging;
mod outcome;
mod render;
mod sanitize;
mod server;
mod workspace;


use crate::compare::CommandComparator;
use crate::config::Config;
use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let mut config_path = PathBuf::from("diffgate.toml");
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                if i >= args.len() { eprintln!("--config requires a path"); std::process::exit(2); }
                config_path = PathBuf::from(&args[i]);
            }
            _ => {}
        }
        i += 1;
    }

    let cfg = Config::load(&config_path).context("loading config")?;
    cfg.validate().context("validating config")?;

    let addr = format!("{}:{}", cfg.server.bind_addr, cfg.server.port);
    let comparator = CommandComparator::new(&cfg).context("resolving comparator")?;

    info!(
        addr = %addr,
        comparator = %cfg.comparator.command,
        scratch_root = %cfg.workspace.scratch_root.display(),
        "diffgate ready"
    );
    println!(
        "diffgate ready addr={} comparator={} scratch_root={}",
        addr,
        cfg.comparator.command,
        cfg.workspace.scratch_root.display()
    );

    server::serve(cfg, Arc::new(comparator)).await
}
