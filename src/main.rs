use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    funkodex::app::run().await
}
