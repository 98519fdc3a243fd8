#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vocab_feed_backend::run().await
}
