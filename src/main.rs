mod line;
mod process;
mod shell;
mod signals;
mod sources;

use shell::Shell;
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr so they never mix with command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SMALLSH_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut smsh = match Shell::init() {
        Ok(smsh) => smsh,
        Err(e) => {
            eprintln!("smallsh: {}", e);
            std::process::exit(1);
        }
    };

    while let Err(e) = smsh.run() {
        eprintln!("smallsh: {}", e);

        smsh.backtrace();
    }

    std::process::exit(smsh.state().last().exit_code());
}
