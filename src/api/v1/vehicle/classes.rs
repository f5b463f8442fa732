use crate::helper_model::VehicleTypeQuery;
use crate::methods;
use warp::http::{Method, StatusCode};
use warp::{Filter, Reply};

// Static desk-side lookup; no authentication required.
pub fn main() -> impl Filter<Extract = (impl Reply,), Error = warp::Rejection> + Clone {
    warp::path("classes")
        .and(warp::path::end())
        .and(warp::method())
        .and(warp::query::<VehicleTypeQuery>())
        .and_then(async move |method: Method, query: VehicleTypeQuery| {
            if method != Method::GET {
                return methods::standard_replies::method_not_allowed_response();
            }
            match methods::catalog::classes_for(&query.vehicle_type) {
                Some(classes) => {
                    let msg = serde_json::json!({
                        "vehicle_type": query.vehicle_type,
                        "classes": classes,
                    });
                    methods::standard_replies::response_with_obj(msg, StatusCode::OK)
                }
                None => {
                    let msg = serde_json::json!({
                        "vehicle_type": query.vehicle_type,
                        "known_types": methods::catalog::vehicle_types(),
                        "error": "Unknown vehicle type",
                    });
                    methods::standard_replies::response_with_obj(msg, StatusCode::NOT_FOUND)
                }
            }
        })
}
