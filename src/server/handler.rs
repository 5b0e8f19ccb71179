// Demo request handler
// Echoes the parsed request back as JSON and counts visits in a cookie

use serde_json::json;

use rawhttp::config::HttpConfig;
use rawhttp::{CookieOptions, Request, Response, Result};

const VISITS_COOKIE: &str = "visits";

/// Build the response for one parsed request
pub fn handle(request: &Request, config: &HttpConfig) -> Result<Response> {
    let visits = request
        .cookie(VISITS_COOKIE)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0)
        + 1;

    let echo = json!({
        "method": request.method(),
        "path": request.path(),
        "version": request.version(),
        "query": request.query(),
        "headers": request.headers(),
        "cookies": request.cookies(),
        "params": request.params(),
        "body": request.body().to_json(),
        "visits": visits,
    });

    let mut response = Response::with_config(config);
    response
        .set_cookie(
            VISITS_COOKIE,
            &visits.to_string(),
            &CookieOptions::new().max_age(86_400).http_only(),
        )
        .json(&echo)?;

    let wants_close = request
        .header("Connection")
        .is_some_and(|v| v.eq_ignore_ascii_case("close"));
    if wants_close || request.version() == Some("HTTP/1.0") {
        response.close_connection();
    }

    Ok(response)
}
