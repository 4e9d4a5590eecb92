// src/main.rs

use monorun::errors::ExitClass;
use monorun::{cli, logging, run};

#[tokio::main]
async fn main() {
    let code = match run_main().await {
        Ok(class) => class.code(),
        Err(err) => {
            eprintln!("monorun error: {err}");
            err.exit_class().code()
        }
    };
    std::process::exit(code);
}

async fn run_main() -> monorun::errors::Result<ExitClass> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
