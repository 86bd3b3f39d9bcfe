use eyre::Report;

#[tokio::main]
async fn main() -> Result<(), Report> {
    fruitline::run().await
}
