use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use gcnv::{cli::Cli, engine::PythonEngine};

fn main() -> Result<()> {
    // Initialize the logger. If the log level is not set via `RUST_LOG`, set it to 'info' by default
    Builder::from_env(Env::default().default_filter_or("info")).init();

    // parse command line; inputs are validated during configuration resolution
    let cli = Cli::parse();
    let engine = PythonEngine::new(cli.python.clone(), cli.engine_scripts.clone());

    gcnv::run(cli, &engine)
}
