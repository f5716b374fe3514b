use actix_web::{error, web, HttpResponse, Responder, Result};
use semtab::Calculus;

use crate::{MoveForm, ParseForm, StateForm};

pub(crate) async fn prop() -> impl Responder {
    HttpResponse::Ok().body(
        "Calculus prop-tableau loaded.
Interact via the /parse /move /close and /validate endpoints"
            .to_string(),
    )
}

pub(crate) async fn prop_parse(form: web::Form<ParseForm>) -> Result<HttpResponse> {
    use semtab::tableau::calculus::{Params, PropTableau};

    let ParseForm { formula, params } = form.0;
    let params: Option<Params> = match params {
        Some(p) => Some(serde_json::from_str(&p).map_err(error::ErrorBadRequest)?),
        None => None,
    };

    let state = PropTableau::parse_formula(&formula, params).map_err(error::ErrorBadRequest)?;

    Ok(HttpResponse::Ok().json(state))
}

pub(crate) async fn prop_validate(form: web::Form<StateForm>) -> Result<HttpResponse> {
    use semtab::tableau::calculus::{PropTableau, State};

    let StateForm { state } = form.0;

    let state: State = serde_json::from_str(&state).map_err(error::ErrorBadRequest)?;
    let res = PropTableau::validate(state);

    Ok(HttpResponse::Ok().json(res))
}

pub(crate) async fn prop_move(form: web::Form<MoveForm>) -> Result<HttpResponse> {
    use semtab::tableau::calculus::{Move, PropTableau, State};

    let MoveForm { state, r#move } = form.0;

    let state: State = serde_json::from_str(&state).map_err(error::ErrorBadRequest)?;
    let r#move: Move = serde_json::from_str(&r#move).map_err(error::ErrorBadRequest)?;

    let state = PropTableau::apply_move(state, r#move).map_err(error::ErrorBadRequest)?;

    Ok(HttpResponse::Ok().json(state))
}

pub(crate) async fn prop_close(form: web::Form<StateForm>) -> Result<HttpResponse> {
    use semtab::tableau::calculus::{PropTableau, State};

    let StateForm { state } = form.0;

    let state: State = serde_json::from_str(&state).map_err(error::ErrorBadRequest)?;

    let res = PropTableau::check_close(state);

    Ok(HttpResponse::Ok().json(res))
}
