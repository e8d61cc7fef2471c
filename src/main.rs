use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match medtutor_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("medtutor: {e}");
            ExitCode::FAILURE
        }
    }
}
