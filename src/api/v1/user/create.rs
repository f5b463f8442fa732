use crate::{POOL, methods, model};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error};
use regex::Regex;
use warp::{Filter, http::Method, http::StatusCode, reply::with_status};

pub fn main() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    lazy_static::lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[\w.+-]+@[\w-]+\.[\w.-]+$").unwrap();
        static ref PHONE_RE: Regex = Regex::new(r"^\d{10}$").unwrap();
    }
    warp::path("create")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(
            async move |method: Method,
                        body: model::NewUser,
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
                        String::from("user/create: token verification failed"),
                    ),
                    Ok(token_is_valid) => {
                        if !token_is_valid {
                            return methods::tokens::token_invalid_warp_return(&access_token.token);
                        }
                        // Token is valid
                        let new_token_in_db_publish =
                            match methods::tokens::rotate_token(&access_token, &user_agent).await {
                                Ok(token_data) => token_data,
                                Err(_) => {
                                    return methods::standard_replies::internal_server_error_response(
                                        String::from("user/create: token rotation failed"),
                                    );
                                }
                            };
                        let Ok(operator) =
                            methods::user::get_user_by_id(&access_token.user_id).await
                        else {
                            return methods::standard_replies::internal_server_error_response(
                                String::from("user/create: database error loading operator"),
                            );
                        };
                        if !methods::user::user_is_manager(&operator) {
                            return methods::user::user_not_manager_wrapped_return(
                                new_token_in_db_publish,
                            );
                        }

                        if body.username.trim().is_empty() || body.password.trim().is_empty() {
                            return methods::standard_replies::bad_request_wrapped(
                                new_token_in_db_publish,
                                "Username, Password, and Role are required",
                            );
                        }
                        if let Some(email_value) = &body.email {
                            if !EMAIL_RE.is_match(email_value) {
                                return methods::standard_replies::bad_request_wrapped(
                                    new_token_in_db_publish,
                                    "Email address is not valid",
                                );
                            }
                        }
                        if let Some(phone_value) = &body.phone {
                            if !PHONE_RE.is_match(phone_value) {
                                return methods::standard_replies::bad_request_wrapped(
                                    new_token_in_db_publish,
                                    "Phone number must be ten digits",
                                );
                            }
                        }

                        let hashed = match bcrypt::hash(&body.password, bcrypt::DEFAULT_COST) {
                            Ok(hashed) => hashed,
                            Err(_) => {
                                return methods::standard_replies::internal_server_error_response(
                                    String::from("user/create: password hashing failed"),
                                );
                            }
                        };
                        let new_user = model::NewUser {
                            username: body.username.trim().to_string(),
                            password: hashed,
                            ..body
                        };

                        use crate::schema::users::dsl::*;
                        let mut pool = POOL.get().unwrap();
                        let insert_result = diesel::insert_into(users)
                            .values(&new_user)
                            .get_result::<model::User>(&mut pool);
                        match insert_result {
                            Err(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                                methods::standard_replies::conflict_wrapped(
                                    new_token_in_db_publish,
                                    "Username already exists",
                                )
                            }
                            Err(_) => methods::standard_replies::internal_server_error_response(
                                String::from("user/create: database error inserting user"),
                            ),
                            Ok(user) => {
                                methods::audit::record_action(
                                    &operator.username,
                                    "user.create",
                                    Some(format!("username={}", user.username)),
                                )
                                .await;
                                let msg = serde_json::json!({"user": user.to_publish_user()});
                                Ok::<_, warp::Rejection>((
                                    methods::tokens::wrap_json_reply_with_token(
                                        new_token_in_db_publish,
                                        with_status(warp::reply::json(&msg), StatusCode::CREATED),
                                    ),
                                ))
                            }
                        }
                    }
                };
            },
        )
}
