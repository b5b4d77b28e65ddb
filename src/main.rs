use env_logger::Env;
use miette::Result;
use release_tool::{command, run};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let matches = command().get_matches();
    run(&matches).await
}
