mod commands;
mod output;
mod terminal;

use commands::{CommandLine, scan};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(&commands.log_file)?;

    let cfg = commands.config();
    let target = commands.target();

    print::header("starting scanner", cfg.quiet);
    scan::scan(target, &cfg, commands.output, &commands.output_path()).await
}
