//! hostmount - mount a filesystem at the specified path.
//!
//! Synopsis:
//!     hostmount [-r] [-o options] [-t FSTYPE] DEV PATH

use std::io::Write;
use std::process::ExitCode;

use hostmount::{
    Host, HostPaths, HostmountError, KnownOptionTable, LoopControl, NativeMounter, Outcome,
    parse_args, run,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = match parse_args(std::env::args()) {
        Ok(args) => args,
        Err(e) => {
            // --help and --version also arrive here, on stdout.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(args.verbose);

    let paths = HostPaths::default();
    let table = KnownOptionTable::linux();
    let binder = LoopControl::new(&paths);
    let mounter = NativeMounter::new(&paths);
    let host = Host {
        paths: &paths,
        table: &table,
        binder: &binder,
        mounter: &mounter,
    };

    match run(&args, &host) {
        Ok(Outcome::Listed(contents)) => {
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(contents.as_bytes());
            let _ = stdout.flush();
            ExitCode::SUCCESS
        }
        Ok(Outcome::Mounted(_)) => ExitCode::SUCCESS,
        Err(HostmountError::Usage(usage)) => {
            eprintln!("{}", usage);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("hostmount: {}", e);
            if let Some(hint) = e.hint() {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
