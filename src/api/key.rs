use std::sync::Arc;

use axum::extract::Extension;
use axum::Json;
use log::{debug, warn};

use crate::api::{AppError, Context};
use crate::models::KeyResponse;

pub async fn nasa_key(
    Extension(state): Extension<Arc<Context>>,
) -> Result<Json<KeyResponse>, AppError> {
    match state.key_source.read() {
        Some(api_key) => {
            debug!("Handing out NASA api key");
            Ok(Json(KeyResponse { api_key }))
        }
        None => {
            warn!("NASA api key requested but none is configured");
            Err(AppError::ConfigMissing)
        }
    }
}
