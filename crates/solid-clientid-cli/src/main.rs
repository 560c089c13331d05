use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    solid_clientid_cli::run().await
}
