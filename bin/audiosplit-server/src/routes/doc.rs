use utoipa::OpenApi;

use crate::routes::api::JobsApi;
use crate::routes::health::HealthApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "audiosplit-server",
    description = "AudioSplit stem separation API",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(HealthApi::openapi());
    root.merge(JobsApi::openapi());
    root
}
