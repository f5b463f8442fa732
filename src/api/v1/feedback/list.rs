use crate::{POOL, methods, model};
use diesel::prelude::*;
use warp::http::{Method, StatusCode};
use warp::{Filter, Reply};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("list")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(async move |method: Method, auth: String, user_agent: String| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            let Some(access_token) = methods::tokens::parse_auth_header(&auth) else {
                return methods::tokens::token_invalid_warp_return(&auth);
            };
            let if_token_valid =
                methods::tokens::verify_user_token(&access_token.user_id, &access_token.token)
                    .await;
            return match if_token_valid {
                Err(methods::tokens::TokenError::NotHex(_)) => {
                    methods::tokens::token_not_hex_warp_return(&access_token.token)
                }
                Err(_) => methods::standard_replies::internal_server_error_response(
                    String::from("feedback/list: token verification failed"),
                ),
                Ok(token_is_valid) => {
                    if !token_is_valid {
                        return methods::tokens::token_invalid_warp_return(&access_token.token);
                    }
                    let new_token_in_db_publish =
                        match methods::tokens::rotate_token(&access_token, &user_agent).await {
                            Ok(token_data) => token_data,
                            Err(_) => {
                                return methods::standard_replies::internal_server_error_response(
                                    String::from("feedback/list: token rotation failed"),
                                );
                            }
                        };

                    use crate::schema::feedback::dsl::*;
                    let mut pool = POOL.get().unwrap();
                    let all_feedback = feedback.get_results::<model::Feedback>(&mut pool);
                    match all_feedback {
                        Ok(rows) => methods::standard_replies::response_with_obj_wrapped(
                            new_token_in_db_publish,
                            rows,
                            StatusCode::OK,
                        ),
                        Err(_) => methods::standard_replies::internal_server_error_response(
                            String::from("feedback/list: database error loading feedback"),
                        ),
                    }
                }
            };
        })
}
