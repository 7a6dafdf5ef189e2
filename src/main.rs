use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    focustrack::run().await
}
