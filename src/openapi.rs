//! OpenAPI document served at `/api-docs/openapi.json`, browsable via
//! Swagger UI at `/swagger-ui`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Policy Decision Point API",
        version = "1.0.0",
        description = "Authorization, policy management, entity graph, and cluster administration surface."
    ),
    tags(
        (name = "authorize", description = "Authorization checks"),
        (name = "policies", description = "Policy CRUD and version activation"),
        (name = "entities", description = "Entity graph management"),
        (name = "cluster", description = "Cluster liveness and backend admission")
    )
)]
struct ApiDoc;

pub fn create_api_doc() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
