//! Check board definitions without building firmware

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use zeroboot_board::{check_board, report, BoardError, CheckOptions};

#[derive(Debug, Parser)]
#[command(name = "zeroboot-check", version, about = "Validate zeroboot board definitions")]
struct Args {
    /// Board definition files
    #[arg(required = true)]
    boards: Vec<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    deny_warnings: bool,

    /// Write <board>.bin blobs into this directory
    #[arg(long, value_name = "DIR")]
    emit: Option<PathBuf>,

    /// Print the resolved configuration of each board
    #[arg(short, long)]
    verbose: bool,
}

fn check(path: &Path, args: &Args) -> Result<(), BoardError> {
    let options = CheckOptions {
        deny_warnings: args.deny_warnings,
        emit_dir: args.emit.clone(),
    };
    let checked = check_board(path, &options)?;
    let label = path.display().to_string();

    if let Some(text) = report::warning_box(&label, &checked.resolution) {
        eprint!("{}", text);
    }
    if args.verbose {
        print!(
            "{}",
            report::boxed(
                &format!("{} ({})", checked.board.name, label),
                &report::summary(&checked.resolution)
            )
        );
    }
    println!("{}: ok", label);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mut failed = 0usize;

    for path in &args.boards {
        if let Err(err) = check(path, &args) {
            eprint!("{}", report::error_box(&path.display().to_string(), &err));
            failed += 1;
        }
    }

    if failed > 0 {
        eprintln!("{} of {} board(s) failed", failed, args.boards.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args() {
        Args::command().debug_assert();

        let args = Args::try_parse_from([
            "zeroboot-check",
            "--deny-warnings",
            "--emit",
            "out",
            "a.toml",
            "b.toml",
        ])
        .unwrap();
        assert!(args.deny_warnings);
        assert_eq!(args.emit, Some(PathBuf::from("out")));
        assert_eq!(args.boards.len(), 2);
        assert!(!args.verbose);

        assert!(Args::try_parse_from(["zeroboot-check"]).is_err());
    }
}
