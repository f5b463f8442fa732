use crate::helper_model::UsernameRequest;
use crate::model::UserRole;
use crate::{POOL, methods};
use diesel::prelude::*;
use warp::http::{Method, StatusCode};
use warp::{Filter, Reply};

pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("delete")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(
            async move |method: Method,
                        body: UsernameRequest,
                        auth: String,
                        user_agent: String| {
                if method != Method::POST {
                    return methods::standard_replies::method_not_allowed_response();
                }
                let Some(access_token) = methods::tokens::parse_auth_header(&auth) else {
                    return methods::tokens::token_invalid_warp_return(&auth);
                };
                let if_token_valid = methods::tokens::verify_user_token(
                    &access_token.user_id,
                    &access_token.token,
                )
                .await;
                return match if_token_valid {
                    Err(methods::tokens::TokenError::NotHex(_)) => {
                        methods::tokens::token_not_hex_warp_return(&access_token.token)
                    }
                    Err(_) => methods::standard_replies::internal_server_error_response(
                        String::from("user/delete: token verification failed"),
                    ),
                    Ok(token_is_valid) => {
                        if !token_is_valid {
                            return methods::tokens::token_invalid_warp_return(&access_token.token);
                        }
                        // token is valid
                        let new_token_in_db_publish =
                            match methods::tokens::rotate_token(&access_token, &user_agent).await {
                                Ok(token_data) => token_data,
                                Err(_) => {
                                    return methods::standard_replies::internal_server_error_response(
                                        String::from("user/delete: token rotation failed"),
                                    );
                                }
                            };
                        let Ok(operator) =
                            methods::user::get_user_by_id(&access_token.user_id).await
                        else {
                            return methods::standard_replies::internal_server_error_response(
                                String::from("user/delete: database error loading operator"),
                            );
                        };
                        if !methods::user::user_is_manager(&operator) {
                            return methods::user::user_not_manager_wrapped_return(
                                new_token_in_db_publish,
                            );
                        }

                        // Only employee accounts can be removed; manager
                        // accounts are permanent.
                        use crate::schema::users::dsl::*;
                        let mut pool = POOL.get().unwrap();
                        let deleted = diesel::delete(
                            users
                                .filter(username.eq(&body.username))
                                .filter(role.eq(UserRole::Employee)),
                        )
                        .execute(&mut pool);
                        match deleted {
                            Ok(0) => methods::standard_replies::not_found_wrapped(
                                new_token_in_db_publish,
                                "Employee not found or cannot delete manager",
                            ),
                            Ok(_) => {
                                methods::audit::record_action(
                                    &operator.username,
                                    "user.delete",
                                    Some(format!("username={}", body.username)),
                                )
                                .await;
                                let msg = serde_json::json!({"deleted": body.username});
                                methods::standard_replies::response_with_obj_wrapped(
                                    new_token_in_db_publish,
                                    msg,
                                    StatusCode::OK,
                                )
                            }
                            Err(_) => methods::standard_replies::internal_server_error_response(
                                String::from("user/delete: database error deleting user"),
                            ),
                        }
                    }
                };
            },
        )
}
