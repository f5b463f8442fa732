mod available;
mod classes;
mod list;
mod new;

use warp::Filter;

pub fn api_v1_vehicle()
-> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path("vehicle")
        .and(
            new::main()
                .or(list::main())
                .or(available::main())
                .or(classes::main()),
        )
        .and(warp::path::end())
}
