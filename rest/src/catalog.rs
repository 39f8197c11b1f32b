use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    response::Response,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use service::catalog::CatalogService;
use uuid::Uuid;

use crate::{error_handler, RestStateDef};

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOfferingTO {
    #[serde(default)]
    pub id: Uuid,
    pub name: Arc<str>,
    pub duration_minutes: u32,
    pub price_cents: i64,
    #[serde(default)]
    pub deleted: Option<time::PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}
impl From<&service::catalog::ServiceOffering> for ServiceOfferingTO {
    fn from(offering: &service::catalog::ServiceOffering) -> Self {
        Self {
            id: offering.id,
            name: offering.name.clone(),
            duration_minutes: offering.duration_minutes,
            price_cents: offering.price_cents,
            deleted: offering.deleted,
            version: offering.version,
        }
    }
}

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_all_offerings::<RestState>))
        .route("/{id}", get(get_offering::<RestState>))
}

pub async fn get_all_offerings<RestState: RestStateDef>(rest_state: State<RestState>) -> Response {
    error_handler(
        (async {
            let offerings: Arc<[ServiceOfferingTO]> = rest_state
                .catalog_service()
                .get_offerings(().into(), None)
                .await?
                .iter()
                .map(ServiceOfferingTO::from)
                .collect();
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&offerings).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn get_offering<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(offering_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let offering = ServiceOfferingTO::from(
                &rest_state
                    .catalog_service()
                    .get_offering(offering_id, ().into(), None)
                    .await?,
            );
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&offering).unwrap()))
                .unwrap())
        })
        .await,
    )
}
