use clap::{CommandFactory, Parser};
use renderdem_runner::Args;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Help and version requests are not errors.
            if e.use_stderr() {
                eprintln!("{}", e);
                std::process::exit(1);
            }
            print!("{}", e);
            return;
        }
    };

    if args.input().is_none() {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        return;
    }

    if let Err(e) = renderdem_runner::run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
