use clap::{Parser, Subcommand};
use rrtools::{export, inspect};

#[derive(Parser)]
struct Opts {
    #[command(subcommand)]
    tool: ToolOpts,
}

#[derive(Subcommand)]
enum ToolOpts {
    Export(export::Opts),
    Inspect(inspect::Opts),
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let opts = Opts::parse();
    match opts.tool {
        ToolOpts::Export(opts) => export::run(opts),
        ToolOpts::Inspect(opts) => inspect::run(opts),
    }
}
