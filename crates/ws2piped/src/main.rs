use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match ws2piped::run_gateway() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let mut stderr = io::stderr().lock();
            let _ = writeln!(stderr, "ws2piped: {error}");
            ExitCode::FAILURE
        }
    }
}
