use crate::POOL;
use crate::model::{AccessToken, NewAccessToken, PublishAccessToken, RequestToken};
use crate::schema::access_tokens::dsl::*;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use hex::FromHexError;
use secrets::Secret;
use std::ops::Add;
use thiserror::Error;
use tokio::task;
use tokio::task::spawn_blocking;
use warp::Rejection;
use warp::Reply;
use warp::http::StatusCode;

async fn generate_unique_token() -> Vec<u8> {
    loop {
        // Generate a secure random 32-byte token
        let token_vec = Secret::<[u8; 32]>::random(|s| s.to_vec());

        let token_to_return = token_vec.clone();

        let token_exists_result = task::spawn_blocking(move || {
            let mut pool = POOL.get().unwrap();
            diesel::select(diesel::dsl::exists(
                crate::schema::access_tokens::table
                    .filter(crate::schema::access_tokens::token.eq(token_vec)),
            ))
            .get_result::<bool>(&mut pool)
        })
        .await;

        let token_exists = match token_exists_result {
            Ok(result) => match result {
                Ok(v) => v,
                Err(e) => {
                    // Treat a DB error as if the token exists, to force a retry.
                    log::error!("database error while checking token uniqueness: {:?}", e);
                    true
                }
            },
            Err(join_err) => {
                log::error!("error joining blocking task: {:?}", join_err);
                true
            }
        };

        // If the token does not exist, return it
        if !token_exists {
            return token_to_return;
        }
    }
}

pub async fn gen_token_object(_user_id: &i32, user_agent: &String) -> NewAccessToken {
    // Desk terminals keep a session for the working week; anything else gets
    // the short-lived default.
    let mut _exp: DateTime<Utc> = Utc::now().add(chrono::Duration::seconds(600));
    if user_agent.starts_with("cardesk-desk") {
        _exp = Utc::now().add(chrono::Duration::days(7));
    }
    NewAccessToken {
        user_id: *_user_id,
        token: generate_unique_token().await,
        exp: _exp,
    }
}

/// The `auth` header carries "<hex token>$<user id>".
pub fn parse_auth_header(auth: &str) -> Option<RequestToken> {
    let token_and_id = auth.split("$").collect::<Vec<&str>>();
    if token_and_id.len() != 2 {
        return None;
    }
    let _user_id = token_and_id[1].parse::<i32>().ok()?;
    Some(RequestToken {
        user_id: _user_id,
        token: String::from(token_and_id[0]),
    })
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is not hex encoded")]
    NotHex(#[from] FromHexError),
    #[error("no database connection available")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

pub async fn verify_user_token(_user_id: &i32, token_data: &String) -> Result<bool, TokenError> {
    let binary_token = hex::decode(token_data)?;
    let uid = *_user_id;
    let mut pool = POOL.get()?;
    let token_in_db = spawn_blocking(move || {
        access_tokens
            .filter(user_id.eq(uid))
            .filter(token.eq(binary_token))
            .first::<AccessToken>(&mut pool)
            .optional()
    })
    .await
    .unwrap()?;
    match token_in_db {
        Some(token_row) => Ok(token_row.exp >= Utc::now()),
        None => Ok(false),
    }
}

pub async fn rm_token_by_binary(token_bit: Vec<u8>) -> usize {
    let mut pool = POOL.get().unwrap();
    spawn_blocking(move || {
        diesel::delete(access_tokens.filter(token.eq(token_bit))).execute(&mut pool)
    })
    .await
    .unwrap()
    .unwrap_or(0)
}

/// Every successful request burns the presented token and answers with a
/// replacement in the `token` response header.
pub async fn rotate_token(
    request_token: &RequestToken,
    user_agent: &String,
) -> QueryResult<PublishAccessToken> {
    let old_token = hex::decode(&request_token.token).unwrap_or_default();
    rm_token_by_binary(old_token).await;
    let new_token = gen_token_object(&request_token.user_id, user_agent).await;
    let mut pool = POOL.get().unwrap();
    let inserted = spawn_blocking(move || {
        diesel::insert_into(access_tokens)
            .values(&new_token)
            .get_result::<AccessToken>(&mut pool)
    })
    .await
    .unwrap()?;
    Ok(inserted.into())
}

pub fn wrap_json_reply_with_token(
    token_data: PublishAccessToken,
    reply: impl Reply,
) -> warp::reply::Response {
    warp::reply::with_header(reply, "token", token_data.token).into_response()
}

pub fn token_not_hex_warp_return(token_data: &str) -> Result<(warp::reply::Response,), Rejection> {
    let error_msg = serde_json::json!({"token": token_data, "error": "Token not in hex format"});
    Ok::<_, Rejection>((warp::reply::with_status(
        warp::reply::json(&error_msg),
        StatusCode::BAD_REQUEST,
    )
    .into_response(),))
}

pub fn token_invalid_warp_return(token_data: &str) -> Result<(warp::reply::Response,), Rejection> {
    let error_msg = serde_json::json!({"token": token_data, "error": "Token not valid"});
    Ok::<_, Rejection>((warp::reply::with_status(
        warp::reply::json(&error_msg),
        StatusCode::UNAUTHORIZED,
    )
    .into_response(),))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_header_parses_token_and_user_id() {
        let parsed = parse_auth_header("deadbeef$42").unwrap();
        assert_eq!(parsed.user_id, 42);
        assert_eq!(parsed.token, "deadbeef");
    }

    #[test]
    fn auth_header_rejects_malformed_input() {
        assert!(parse_auth_header("deadbeef").is_none());
        assert!(parse_auth_header("deadbeef$notanumber").is_none());
        assert!(parse_auth_header("a$b$c").is_none());
    }

    #[tokio::test]
    async fn non_hex_token_is_distinguished_from_lookup_failures() {
        let result = verify_user_token(&1, &String::from("not-hex")).await;
        assert!(matches!(result, Err(TokenError::NotHex(_))));
    }
}
