#[tokio::main]
async fn main() -> anyhow::Result<()> {
    partner_portal::bootstrapper::run().await
}
