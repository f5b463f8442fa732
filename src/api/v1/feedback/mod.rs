mod list;
mod new;

use warp::Filter;

pub fn api_v1_feedback()
-> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("feedback")
        .and(new::main().or(list::main()))
        .and(warp::path::end())
}
