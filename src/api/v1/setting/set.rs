use crate::{POOL, methods, model};
use diesel::prelude::*;
use warp::http::{Method, StatusCode};
use warp::{Filter, Reply};

// Upsert so a key can be set before it ever had a value.
pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("set")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(
            async move |method: Method,
                        body: model::Setting,
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
                        String::from("setting/set: token verification failed"),
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
                                        String::from("setting/set: token rotation failed"),
                                    );
                                }
                            };
                        let Ok(operator) =
                            methods::user::get_user_by_id(&access_token.user_id).await
                        else {
                            return methods::standard_replies::internal_server_error_response(
                                String::from("setting/set: database error loading operator"),
                            );
                        };
                        if !methods::user::user_is_manager(&operator) {
                            return methods::user::user_not_manager_wrapped_return(
                                new_token_in_db_publish,
                            );
                        }

                        if body.key.trim().is_empty() {
                            return methods::standard_replies::bad_request_wrapped(
                                new_token_in_db_publish,
                                "Setting key is required",
                            );
                        }

                        use crate::schema::settings::dsl::*;
                        let mut pool = POOL.get().unwrap();
                        let upsert_result = diesel::insert_into(settings)
                            .values(&body)
                            .on_conflict(key)
                            .do_update()
                            .set(value.eq(&body.value))
                            .get_result::<model::Setting>(&mut pool);
                        match upsert_result {
                            Ok(saved) => {
                                methods::audit::record_action(
                                    &operator.username,
                                    "setting.set",
                                    Some(format!("{} = {}", saved.key, saved.value)),
                                )
                                .await;
                                methods::standard_replies::response_with_obj_wrapped(
                                    new_token_in_db_publish,
                                    saved,
                                    StatusCode::OK,
                                )
                            }
                            Err(_) => methods::standard_replies::internal_server_error_response(
                                String::from("setting/set: database error saving setting"),
                            ),
                        }
                    }
                };
            },
        )
}
