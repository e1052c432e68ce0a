//! Domain operations against the diaries service
//!
//! Every command follows the same round trip, so a single [`round_trip`]
//! helper carries the shared flow: send, wait, classify the status, decode.
//! What differs per command is the reply decoder and the failure policy for
//! a rejecting status, which is why the helper returns a [`Reply`] instead of
//! flattening rejection into an error: list-style commands report a rejection
//! and exit normally, while composite workflows escalate it.

use crate::rpc::RemoteProcedureCall;
use diaries_core::{codec, Diary, Error, Page, Registration, Request, Result, SigninReply, Status};
use serde_json::Value;
use std::time::Duration;

/// Bound applied to every wait for a correlated reply
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of one round trip whose reply decoded successfully
#[derive(Debug, Clone)]
pub enum Reply<T> {
    /// The service accepted the request; decoded payload attached
    Accepted(T),
    /// The service rejected the request; decoded status attached
    Rejected(Status),
}

impl<T> Reply<T> {
    /// Escalate a rejection into a fatal error
    ///
    /// Used by workflows whose failure policy treats a non-ok status as
    /// aborting, such as the first call of the composite list-pages chain.
    pub fn into_result(self) -> Result<T> {
        match self {
            Reply::Accepted(value) => Ok(value),
            Reply::Rejected(status) => Err(Error::rejected(&status)),
        }
    }
}

/// One complete request/response round trip
///
/// Sends the request, waits for the correlated reply within
/// [`DEFAULT_TIMEOUT`], and decodes the payload only when the status is ok.
/// Decode failures are local to this round trip.
pub async fn round_trip<T>(
    rpc: &RemoteProcedureCall,
    request: Request,
    decode: impl FnOnce(&Value) -> Result<T>,
) -> Result<Reply<T>> {
    let token = rpc.send(&request).await?;
    let response = rpc.wait_for_response(token, DEFAULT_TIMEOUT).await?;

    if !response.is_ok() {
        return Ok(Reply::Rejected(response.status));
    }
    Ok(Reply::Accepted(decode(&response.payload)?))
}

/// Sign in, yielding the access/refresh token pair
pub async fn signin(
    rpc: &RemoteProcedureCall,
    username: &str,
    password: &str,
) -> Result<Reply<SigninReply>> {
    let request = Request::new("signin")
        .param("username", username)
        .param("password", password);
    round_trip(rpc, request, codec::decode_signin_reply).await
}

/// Register a new user, yielding the assigned id
pub async fn register(rpc: &RemoteProcedureCall, registration: &Registration) -> Result<Reply<i64>> {
    let request = Request::new("register")
        .param("username", registration.username.as_str())
        .param("password", registration.password.as_str())
        .param("firstname", registration.firstname.as_str())
        .param("lastname", registration.lastname.as_str())
        .param("knownas", registration.knownas.as_str())
        .param("email", registration.email.as_str())
        .param("phone", registration.phone.as_str());
    round_trip(rpc, request, codec::decode_registration_id).await
}

/// Fetch the signed-in user's diaries
pub async fn get_diaries(
    rpc: &RemoteProcedureCall,
    access_token: &str,
) -> Result<Reply<Vec<Diary>>> {
    let request = Request::new("getDiaries").param("accessToken", access_token);
    round_trip(rpc, request, |payload| {
        codec::decode_list(payload, codec::decode_diary)
    })
    .await
}

/// Fetch the pages of one diary
pub async fn get_pages(rpc: &RemoteProcedureCall, diary_id: i64) -> Result<Reply<Vec<Page>>> {
    let request = Request::new("getPages").param("diary", diary_id);
    round_trip(rpc, request, |payload| {
        codec::decode_list(payload, codec::decode_page)
    })
    .await
}

/// Composite workflow: pages of the user's first diary
///
/// Resolves the diary collection first and requires at least one diary to
/// exist, failing fast with [`Error::NoDiariesFound`] before any getPages
/// request is sent. The two calls are strictly sequential because the second
/// is scoped to the first diary's id.
pub async fn get_pages_of_first_diary(
    rpc: &RemoteProcedureCall,
    access_token: &str,
) -> Result<(Diary, Vec<Page>)> {
    let diaries = get_diaries(rpc, access_token).await?.into_result()?;
    tracing::info!("Diaries:");
    for diary in &diaries {
        tracing::info!("    {diary}");
    }

    let Some(first) = diaries.into_iter().next() else {
        return Err(Error::NoDiariesFound);
    };

    let pages = get_pages(rpc, first.id).await?.into_result()?;
    Ok((first, pages))
}
