use crate::methods::reservation::{BookingError, BookingRequest};
use crate::{POOL, methods};
use chrono::NaiveDate;
use serde_derive::{Deserialize, Serialize};
use tokio::task::spawn_blocking;
use warp::{Filter, http::Method, http::StatusCode, reply::with_status};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
struct NewReservationRequestBodyData {
    customer_name: String,
    vehicle_id: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
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
                        body: NewReservationRequestBodyData,
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
                        String::from("reservation/new: token verification failed"),
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
                                        String::from("reservation/new: token rotation failed"),
                                    );
                                }
                            };

                        // Vehicle flag and reservation row move together or
                        // not at all.
                        let request = BookingRequest {
                            customer_name: body.customer_name.clone(),
                            vehicle_id: body.vehicle_id,
                            start_date: body.start_date,
                            end_date: body.end_date,
                        };
                        let mut pool = POOL.get().unwrap();
                        let booking_result = spawn_blocking(move || {
                            methods::reservation::book_vehicle(&mut pool, &request)
                        })
                        .await
                        .unwrap();

                        match booking_result {
                            Ok((reservation, vehicle)) => {
                                if let Ok(operator) =
                                    methods::user::get_user_by_id(&access_token.user_id).await
                                {
                                    methods::audit::record_action(
                                        &operator.username,
                                        "reservation.create",
                                        Some(format!(
                                            "confirmation={} vehicle_id={}",
                                            reservation.confirmation, vehicle.id
                                        )),
                                    )
                                    .await;
                                }
                                let msg = serde_json::json!({
                                    "reservation": reservation,
                                    "vehicle": vehicle,
                                });
                                Ok::<_, warp::Rejection>((
                                    methods::tokens::wrap_json_reply_with_token(
                                        new_token_in_db_publish,
                                        with_status(warp::reply::json(&msg), StatusCode::CREATED),
                                    ),
                                ))
                            }
                            Err(BookingError::VehicleNotFound) => {
                                methods::standard_replies::not_found_wrapped(
                                    new_token_in_db_publish,
                                    "Vehicle not found",
                                )
                            }
                            Err(BookingError::VehicleUnavailable(current)) => {
                                methods::standard_replies::forbidden_wrapped(
                                    new_token_in_db_publish,
                                    &format!("Vehicle is {}, not Available", current.as_str()),
                                )
                            }
                            Err(BookingError::InvalidDates) => {
                                methods::standard_replies::bad_request_wrapped(
                                    new_token_in_db_publish,
                                    "End date precedes start date",
                                )
                            }
                            Err(BookingError::EmptyCustomerName) => {
                                methods::standard_replies::bad_request_wrapped(
                                    new_token_in_db_publish,
                                    "Customer name is required",
                                )
                            }
                            Err(_) => methods::standard_replies::internal_server_error_response(
                                String::from("reservation/new: database error booking vehicle"),
                            ),
                        }
                    }
                };
            },
        )
}
