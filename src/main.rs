#[tokio::main]
async fn main() -> anyhow::Result<()> {
    eduplay::bootstrapper::run().await
}
