use crate::model::VehicleStatus;
use crate::{POOL, methods, model};
use diesel::prelude::*;
use serde_derive::{Deserialize, Serialize};
use warp::{Filter, http::Method, http::StatusCode, reply::with_status};

#[derive(Deserialize, Serialize, Debug, Clone)]
struct NewVehicleRequest {
    brand: String,
    model: String,
    year: i32,
    odometer_km: i32,
    rate_per_day: f64,
    rate_per_km: f64,
    vehicle_type: String,
    vehicle_class: String,
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
                        body: NewVehicleRequest,
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
                        String::from("vehicle/new: token verification failed"),
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
                                        String::from("vehicle/new: token rotation failed"),
                                    );
                                }
                            };
                        let Ok(operator) =
                            methods::user::get_user_by_id(&access_token.user_id).await
                        else {
                            return methods::standard_replies::internal_server_error_response(
                                String::from("vehicle/new: database error loading operator"),
                            );
                        };
                        if !methods::user::user_is_manager(&operator) {
                            return methods::user::user_not_manager_wrapped_return(
                                new_token_in_db_publish,
                            );
                        }

                        if body.brand.trim().is_empty() || body.model.trim().is_empty() {
                            return methods::standard_replies::bad_request_wrapped(
                                new_token_in_db_publish,
                                "All fields are required",
                            );
                        }
                        if body.rate_per_day <= 0.0 || body.rate_per_km < 0.0 || body.odometer_km < 0
                        {
                            return methods::standard_replies::bad_request_wrapped(
                                new_token_in_db_publish,
                                "Bad vehicle data provided",
                            );
                        }
                        if !methods::catalog::is_valid_class(&body.vehicle_type, &body.vehicle_class)
                        {
                            return methods::standard_replies::bad_request_wrapped(
                                new_token_in_db_publish,
                                "Unknown vehicle type or class",
                            );
                        }

                        let new_vehicle = model::NewVehicle {
                            brand: body.brand.trim().to_string(),
                            model: body.model.trim().to_string(),
                            year: body.year,
                            odometer_km: body.odometer_km,
                            rate_per_day: body.rate_per_day,
                            rate_per_km: body.rate_per_km,
                            vehicle_type: body.vehicle_type,
                            vehicle_class: body.vehicle_class,
                            status: VehicleStatus::Available,
                        };
                        use crate::schema::vehicles::dsl as vehicle_query;
                        let mut pool = POOL.get().unwrap();
                        let insert_result = diesel::insert_into(vehicle_query::vehicles)
                            .values(&new_vehicle)
                            .get_result::<model::Vehicle>(&mut pool);
                        match insert_result {
                            Err(_) => methods::standard_replies::internal_server_error_response(
                                String::from("vehicle/new: database error inserting vehicle"),
                            ),
                            Ok(vehicle) => {
                                methods::audit::record_action(
                                    &operator.username,
                                    "vehicle.create",
                                    Some(format!("vehicle_id={}", vehicle.id)),
                                )
                                .await;
                                let msg = serde_json::json!({"vehicle": vehicle});
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
