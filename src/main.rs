#[tokio::main]
async fn main() {
    if let Err(err) = checkin_server::run().await {
        tracing::error!(error = %err, "check-in server stopped");
        std::process::exit(1);
    }
}
