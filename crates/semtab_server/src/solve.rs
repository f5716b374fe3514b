use actix_web::{error, web, HttpResponse, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use semtab::{is_tautology, parse::parse_prop_formula, random_tautology, Formula};

#[derive(Deserialize)]
pub(crate) struct SolveForm {
    formula: String,
}

#[derive(Serialize)]
struct SolveResponse {
    formula: String,
    tautology: bool,
}

pub(crate) async fn tautology(form: web::Form<SolveForm>) -> Result<HttpResponse> {
    let f = parse_prop_formula(&form.formula).map_err(error::ErrorBadRequest)?;

    let res = SolveResponse {
        formula: f.to_string(),
        tautology: is_tautology(&f),
    };

    Ok(HttpResponse::Ok().json(res))
}

#[derive(Deserialize)]
pub(crate) struct RandomForm {
    #[serde(rename = "varBound")]
    var_bound: u32,
    depth: u32,
    #[serde(rename = "noConstants", default)]
    no_constants: bool,
    #[serde(rename = "maxAttempts", default = "default_attempts")]
    max_attempts: u32,
}

fn default_attempts() -> u32 {
    1000
}

#[derive(Serialize)]
struct RandomResponse {
    formula: Option<Formula>,
    pretty: Option<String>,
}

pub(crate) async fn random(form: web::Form<RandomForm>) -> Result<HttpResponse> {
    let RandomForm {
        var_bound,
        depth,
        no_constants,
        max_attempts,
    } = form.0;

    let mut rng = StdRng::from_entropy();
    let found = random_tautology(&mut rng, var_bound, depth, no_constants, max_attempts)
        .map_err(error::ErrorBadRequest)?;

    let res = RandomResponse {
        pretty: found.as_ref().map(|f| f.to_string()),
        formula: found,
    };

    Ok(HttpResponse::Ok().json(res))
}
