mod customer;
mod feedback;
mod log;
mod reservation;
mod setting;
mod user;
mod vehicle;

use warp::Filter;

pub fn api_v1() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("v1")
        .and(
            user::api_v1_user()
                .or(customer::api_v1_customer())
                .or(vehicle::api_v1_vehicle())
                .or(reservation::api_v1_reservation())
                .or(feedback::api_v1_feedback())
                .or(log::api_v1_log())
                .or(setting::api_v1_setting()),
        )
        .and(warp::path::end())
}
