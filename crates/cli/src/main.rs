use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    doorman_cli::run().await
}
