#[tokio::main]
async fn main() {
    party_venue_backend::run().await;
}
