use std::process::ExitCode;

fn main() -> ExitCode {
    match rombuild::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
