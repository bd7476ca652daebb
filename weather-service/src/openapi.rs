use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use common::models::{ForecastResponse, HealthResponse, LookupResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::lookup,
        handlers::get_forecast,
    ),
    components(schemas(
        HealthResponse,
        LookupResponse,
        ForecastResponse,
    )),
    tags(
        (name = "weather", description = "Current weather lookups"),
    ),
)]
struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
