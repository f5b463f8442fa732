use crate::{POOL, methods, model};
use diesel::prelude::*;
use warp::http::{Method, StatusCode};
use warp::{Filter, Reply};

// The action log is a manager-only view.
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
                    String::from("log/list: token verification failed"),
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
                                    String::from("log/list: token rotation failed"),
                                );
                            }
                        };
                    let Ok(operator) = methods::user::get_user_by_id(&access_token.user_id).await
                    else {
                        return methods::standard_replies::internal_server_error_response(
                            String::from("log/list: database error loading operator"),
                        );
                    };
                    if !methods::user::user_is_manager(&operator) {
                        return methods::user::user_not_manager_wrapped_return(
                            new_token_in_db_publish,
                        );
                    }

                    use crate::schema::action_logs::dsl::*;
                    let mut pool = POOL.get().unwrap();
                    let entries = action_logs
                        .order(created_at.desc())
                        .get_results::<model::ActionLog>(&mut pool);
                    match entries {
                        Ok(rows) => methods::standard_replies::response_with_obj_wrapped(
                            new_token_in_db_publish,
                            rows,
                            StatusCode::OK,
                        ),
                        Err(_) => methods::standard_replies::internal_server_error_response(
                            String::from("log/list: database error loading action log"),
                        ),
                    }
                }
            };
        })
}
