use crate::{POOL, methods, model};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error};
use warp::{Filter, http::Method, http::StatusCode, reply::with_status};

pub fn main() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("new")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(
            async move |method: Method,
                        body: model::NewCustomer,
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
                        String::from("customer/new: token verification failed"),
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
                                        String::from("customer/new: token rotation failed"),
                                    );
                                }
                            };

                        // Every field on the intake form is mandatory.
                        let required = [
                            &body.name,
                            &body.address,
                            &body.phone,
                            &body.license_number,
                            &body.insurance_company,
                            &body.policy_number,
                        ];
                        if required.iter().any(|field| field.trim().is_empty()) {
                            return methods::standard_replies::bad_request_wrapped(
                                new_token_in_db_publish,
                                "All fields are required",
                            );
                        }

                        use crate::schema::customers::dsl::*;
                        let mut pool = POOL.get().unwrap();
                        let insert_result = diesel::insert_into(customers)
                            .values(&body)
                            .get_result::<model::Customer>(&mut pool);
                        match insert_result {
                            Err(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                                methods::standard_replies::conflict_wrapped(
                                    new_token_in_db_publish,
                                    "Customer with this name already exists",
                                )
                            }
                            Err(_) => methods::standard_replies::internal_server_error_response(
                                String::from("customer/new: database error inserting customer"),
                            ),
                            Ok(customer) => {
                                if let Ok(operator) =
                                    methods::user::get_user_by_id(&access_token.user_id).await
                                {
                                    methods::audit::record_action(
                                        &operator.username,
                                        "customer.create",
                                        Some(format!("name={}", customer.name)),
                                    )
                                    .await;
                                }
                                let msg = serde_json::json!({"customer": customer});
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
