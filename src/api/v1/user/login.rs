use crate::POOL;
use crate::methods;
use crate::model::{AccessToken, PublishAccessToken, User};
use bcrypt::verify;
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use tokio::task;
use warp::Filter;
use warp::http::StatusCode;

#[derive(Deserialize, Serialize, Clone)]
struct LoginData {
    username: String,
    password: String,
}

pub fn main() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("login")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(warp::header::<String>("user-agent"))
        .and_then(move |login_data: LoginData, user_agent: String| {
            async move {
                use crate::schema::users::dsl::*;
                let mut pool = POOL.get().unwrap();
                let input_username = login_data.username.clone();
                let input_password = login_data.password.clone();
                let result = task::spawn_blocking(move || {
                    users
                        .filter(username.eq(&login_data.username))
                        .get_result::<User>(&mut pool)
                })
                .await
                .unwrap();

                match result {
                    Ok(user) => {
                        if verify(&input_password, &user.password).unwrap_or(false) {
                            // user and password are verified
                            let new_access_token =
                                methods::tokens::gen_token_object(&user.id, &user_agent).await;
                            let mut pool = POOL.get().unwrap();
                            let insert_token_result = task::spawn_blocking(move || {
                                use crate::schema::access_tokens::dsl::*;
                                diesel::insert_into(access_tokens)
                                    .values(&new_access_token)
                                    .get_result::<AccessToken>(&mut pool)
                            })
                            .await
                            .unwrap();

                            let Ok(token_row) = insert_token_result else {
                                return methods::standard_replies::internal_server_error_response(
                                    String::from("user/login: database error storing access token"),
                                );
                            };

                            methods::audit::record_action(&user.username, "user.login", None)
                                .await;

                            let pub_token: PublishAccessToken = token_row.into();
                            let user_msg = serde_json::json!({
                                "user": user.to_publish_user(),
                                "access_token": pub_token,
                            });
                            methods::standard_replies::response_with_obj(user_msg, StatusCode::OK)
                        } else {
                            invalid_credentials(&input_username)
                        }
                    }
                    Err(_) => invalid_credentials(&input_username),
                }
            }
        })
}

fn invalid_credentials(
    attempted_username: &str,
) -> Result<(warp::reply::Response,), warp::Rejection> {
    // Same reply whether the account is missing or the password is wrong.
    let error_msg = serde_json::json!({
        "username": attempted_username,
        "error": "Credentials invalid",
    });
    methods::standard_replies::response_with_obj(error_msg, StatusCode::FORBIDDEN)
}
