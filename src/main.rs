use std::process::ExitCode;

fn main() -> ExitCode {
    match cmdtree::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
