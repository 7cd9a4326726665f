use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform error envelope for every non-2xx response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub errors: Vec<String>,
}
