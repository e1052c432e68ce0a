//! List-pages command
//!
//! The one composite workflow: the diary collection is resolved first, and
//! an empty collection aborts before any getPages request is sent. The
//! connection is still released on that path.

use diaries_client::{requests, Config, State};
use diaries_core::Result;

pub async fn run(config: &Config) -> Result<()> {
    let state = State::read(config.state_path())?;
    tracing::debug!("state:\n{}", state.to_json()?);

    super::with_connection(config, |rpc| async move {
        let (diary, pages) =
            requests::get_pages_of_first_diary(&rpc, &state.access_token).await?;

        tracing::info!("Pages of '{diary}':");
        for page in &pages {
            tracing::info!("    {page}");
        }
        Ok(())
    })
    .await
}
