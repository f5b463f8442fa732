use crate::model::NewFeedback;
use crate::{POOL, methods, model};
use chrono::Utc;
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::{Filter, http::Method, http::StatusCode, reply::with_status};

#[derive(Deserialize, Serialize, Debug, Clone)]
struct NewFeedbackRequest {
    customer_name: String,
    message: String,
}

pub fn main() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("new")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(
            async move |method: Method,
                        body: NewFeedbackRequest,
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
                        String::from("feedback/new: token verification failed"),
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
                                        String::from("feedback/new: token rotation failed"),
                                    );
                                }
                            };

                        if body.customer_name.trim().is_empty() || body.message.trim().is_empty() {
                            return methods::standard_replies::bad_request_wrapped(
                                new_token_in_db_publish,
                                "Customer name and message are required",
                            );
                        }

                        use crate::schema::feedback::dsl::*;
                        let mut pool = POOL.get().unwrap();
                        let insert_result = diesel::insert_into(feedback)
                            .values(&NewFeedback {
                                customer_name: body.customer_name.trim().to_string(),
                                message: body.message.trim().to_string(),
                                created_at: Utc::now(),
                            })
                            .get_result::<model::Feedback>(&mut pool);
                        match insert_result {
                            Ok(entry) => {
                                if let Ok(operator) =
                                    methods::user::get_user_by_id(&access_token.user_id).await
                                {
                                    methods::audit::record_action(
                                        &operator.username,
                                        "feedback.create",
                                        Some(format!("customer_name={}", entry.customer_name)),
                                    )
                                    .await;
                                }
                                let msg = serde_json::json!({"feedback": entry});
                                Ok::<_, warp::Rejection>((
                                    methods::tokens::wrap_json_reply_with_token(
                                        new_token_in_db_publish,
                                        with_status(warp::reply::json(&msg), StatusCode::CREATED),
                                    ),
                                ))
                            }
                            Err(_) => methods::standard_replies::internal_server_error_response(
                                String::from("feedback/new: database error inserting feedback"),
                            ),
                        }
                    }
                };
            },
        )
}
