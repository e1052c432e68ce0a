//! Sign-in command

use diaries_client::{requests, Config, Reply, State};
use diaries_core::{Error, Result};

pub async fn run(config: &Config, username: &str, password: &str) -> Result<()> {
    super::with_connection(config, |rpc| async move {
        match requests::signin(&rpc, username, password).await {
            Ok(Reply::Accepted(tokens)) => {
                tracing::info!("'{username}' is signed-in");
                tracing::info!("accessToken:  {}", tokens.access_token);
                tracing::info!("refreshToken: {}", tokens.refresh_token);

                let path = config.state_path();
                State::from(tokens).write(&path)?;
                tracing::info!(path = %path.display(), "Session state saved");
                Ok(())
            }
            Ok(Reply::Rejected(status)) => {
                tracing::info!("status: {status}");
                Ok(())
            }
            // A malformed token document is reported; the command still
            // disconnects cleanly and exits without persisting
            Err(Error::MalformedPayload(msg)) => {
                tracing::info!("{msg}");
                Ok(())
            }
            Err(e) => Err(e),
        }
    })
    .await
}
