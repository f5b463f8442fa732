use crate::helper_model::ReservationIdRequest;
use crate::methods::reservation::BookingError;
use crate::{POOL, methods};
use tokio::task::spawn_blocking;
use warp::http::{Method, StatusCode};
use warp::{Filter, Reply};

// Vehicle returned: reservation Completed, vehicle back on the Available list.
pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("complete")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::body::json())
        .and(warp::header::<String>("auth"))
        .and(warp::header::<String>("user-agent"))
        .and_then(
            async move |method: Method,
                        body: ReservationIdRequest,
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
                        String::from("reservation/complete: token verification failed"),
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
                                        String::from("reservation/complete: token rotation failed"),
                                    );
                                }
                            };

                        let mut pool = POOL.get().unwrap();
                        let transition_result = spawn_blocking(move || {
                            methods::reservation::complete(&mut pool, body.reservation_id)
                        })
                        .await
                        .unwrap();

                        match transition_result {
                            Ok((reservation, vehicle)) => {
                                if let Ok(operator) =
                                    methods::user::get_user_by_id(&access_token.user_id).await
                                {
                                    methods::audit::record_action(
                                        &operator.username,
                                        "reservation.complete",
                                        Some(format!("confirmation={}", reservation.confirmation)),
                                    )
                                    .await;
                                }
                                let msg = serde_json::json!({
                                    "reservation": reservation,
                                    "vehicle": vehicle,
                                });
                                methods::standard_replies::response_with_obj_wrapped(
                                    new_token_in_db_publish,
                                    msg,
                                    StatusCode::OK,
                                )
                            }
                            Err(BookingError::ReservationNotFound) => {
                                methods::standard_replies::not_found_wrapped(
                                    new_token_in_db_publish,
                                    "Reservation not found",
                                )
                            }
                            Err(BookingError::IllegalTransition(current)) => {
                                methods::standard_replies::forbidden_wrapped(
                                    new_token_in_db_publish,
                                    &format!(
                                        "Reservation is {}, completion requires Ongoing",
                                        current.as_str()
                                    ),
                                )
                            }
                            Err(_) => methods::standard_replies::internal_server_error_response(
                                String::from("reservation/complete: database error"),
                            ),
                        }
                    }
                };
            },
        )
}
