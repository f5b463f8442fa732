mod api;
mod bootstrap;
mod db;
mod helper_model;
mod methods;
mod model;
mod scheduled_tasks;
mod schema;

#[macro_use]
extern crate lazy_static;

use warp::Filter;

lazy_static! {
    pub static ref POOL: db::SqlitePool = db::get_connection_pool();
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    {
        let mut conn = POOL.get().expect("database unavailable at startup");
        bootstrap::run(&mut conn).expect("schema bootstrap failed");
    }

    tokio::spawn(scheduled_tasks::nightly_task());

    // routing for the server
    let httpd = api::api().and(warp::path::end());
    log::info!("listening on 127.0.0.1:3030");
    warp::serve(httpd).run(([127, 0, 0, 1], 3030)).await;
}
