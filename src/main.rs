// src/main.rs

use std::process::ExitCode;

use uibuild::{cli, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("uibuild: {err:?}");
        return ExitCode::FAILURE;
    }

    match uibuild::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("uibuild: {err:?}");
            ExitCode::FAILURE
        }
    }
}
