use console_collector::error::CollectorError;

#[tokio::main]
async fn main() -> Result<(), CollectorError> {
    console_collector::app::run().await
}
