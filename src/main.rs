use anyhow::Result;
use parley::app::App;
use parley::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let mut app = App::new(config)?;
    app.run().await?;

    Ok(())
}
