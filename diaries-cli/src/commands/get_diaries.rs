//! List-diaries command

use diaries_client::{requests, Config, Reply, State};
use diaries_core::{Error, Result};

pub async fn run(config: &Config) -> Result<()> {
    let state = State::read(config.state_path())?;
    tracing::debug!("state:\n{}", state.to_json()?);

    super::with_connection(config, |rpc| async move {
        match requests::get_diaries(&rpc, &state.access_token).await? {
            Reply::Accepted(diaries) => {
                let json = serde_json::to_string_pretty(&diaries)
                    .map_err(|e| Error::Serialization(e.to_string()))?;
                tracing::info!("List of diaries:\n{json}");
            }
            Reply::Rejected(status) => {
                tracing::info!("status: {status}");
            }
        }
        Ok(())
    })
    .await
}
