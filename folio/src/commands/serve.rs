use folio_config::Config;
use tracing::info;

use crate::{
    email,
    environment::{self, ServiceConfig},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Setting up email transport");
    let email = email::connect(&config.email).await?;

    let server = environment::rest_server(ServiceConfig::new(&config), email);
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve().await
}
