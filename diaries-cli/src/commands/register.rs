//! Register command

use diaries_client::{requests, Config, Reply};
use diaries_core::{Registration, Result};

pub async fn run(config: &Config, registration: &Registration) -> Result<()> {
    super::with_connection(config, |rpc| async move {
        match requests::register(&rpc, registration).await? {
            Reply::Accepted(id) => {
                tracing::info!("User registered: '{}', id: {id}", registration.username);
            }
            Reply::Rejected(status) => {
                tracing::info!("status: {status}");
            }
        }
        Ok(())
    })
    .await
}
