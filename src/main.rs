#[tokio::main]
async fn main() -> std::io::Result<()> {
    prescription_client::run_with_config().await
}
