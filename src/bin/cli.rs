use std::process::ExitCode;

fn main() -> ExitCode {
    match hcvcs_ui_terminal::run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("hc-vcs: {err:#}");
            ExitCode::from(2)
        }
    }
}
