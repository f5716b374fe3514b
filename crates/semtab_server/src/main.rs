use actix_web::{middleware, web, App, HttpResponse, HttpServer, Responder};

use serde::Deserialize;

mod solve;
mod tableau;

#[derive(Deserialize)]
struct ParseForm {
    formula: String,
    params: Option<String>,
}

#[derive(Deserialize)]
struct StateForm {
    state: String,
}

#[derive(Deserialize)]
struct MoveForm {
    state: String,
    r#move: String,
}

async fn index() -> impl Responder {
    HttpResponse::Ok().body(
        "semtab API Server

Available endpoints:
prop-tableau
solve",
    )
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    HttpServer::new(|| {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(
                middleware::DefaultHeaders::new().add(("Access-Control-Allow-Origin", "*")),
            )
            .route("/", web::get().to(index))
            // Interactive tableau
            .route("/prop-tableau", web::get().to(tableau::prop))
            .route("/prop-tableau/parse", web::post().to(tableau::prop_parse))
            .route(
                "/prop-tableau/validate",
                web::post().to(tableau::prop_validate),
            )
            .route("/prop-tableau/move", web::post().to(tableau::prop_move))
            .route("/prop-tableau/close", web::post().to(tableau::prop_close))
            // Automatic solver
            .route("/solve", web::post().to(solve::tautology))
            .route("/solve/random", web::post().to(solve::random))
    })
    .bind("127.0.0.1:7000")?
    .run()
    .await
}
