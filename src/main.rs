use clap::Parser;
use tracing::error;
use visual_verdict::{cli, pipeline::ExitStatus};

fn main() {
    let args = cli::Args::parse();
    let status = match cli::dispatch(args) {
        Ok(status) => status,
        Err(err) => {
            error!("{:#}", err);
            ExitStatus::Error
        }
    };
    std::process::exit(status.code());
}
