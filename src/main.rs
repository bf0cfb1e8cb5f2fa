use clap::Parser;
use reorder::cli::commands::Cli;
use reorder::cli::handlers;

fn main() {
    reorder::logging::init();
    let cli = Cli::parse();

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
