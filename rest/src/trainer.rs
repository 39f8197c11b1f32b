use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use service::scheduling::{SchedulingService, SlotDuration};
use service::trainer::TrainerService;
use service::{ServiceError, ValidationFailureItem};
use uuid::Uuid;

use crate::{error_handler, RestStateDef};

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerTO {
    #[serde(default)]
    pub id: Uuid,
    pub first_name: Arc<str>,
    pub last_name: Arc<str>,
    pub specialty: Option<Arc<str>>,
    #[serde(default)]
    pub deleted: Option<time::PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}
impl From<&service::trainer::Trainer> for TrainerTO {
    fn from(trainer: &service::trainer::Trainer) -> Self {
        Self {
            id: trainer.id,
            first_name: trainer.first_name.clone(),
            last_name: trainer.last_name.clone(),
            specialty: trainer.specialty.clone(),
            deleted: trainer.deleted,
            version: trainer.version,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FreeSlotsQuery {
    pub date: time::Date,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub offering_id: Option<Uuid>,
}

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_all_trainers::<RestState>))
        .route("/{id}", get(get_trainer::<RestState>))
        .route("/{id}/free-slots", get(get_free_slots::<RestState>))
}

pub async fn get_all_trainers<RestState: RestStateDef>(rest_state: State<RestState>) -> Response {
    error_handler(
        (async {
            let trainers: Arc<[TrainerTO]> = rest_state
                .trainer_service()
                .get_all(().into(), None)
                .await?
                .iter()
                .map(TrainerTO::from)
                .collect();
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&trainers).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn get_trainer<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(trainer_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let trainer = TrainerTO::from(
                &rest_state
                    .trainer_service()
                    .get(trainer_id, ().into(), None)
                    .await?,
            );
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&trainer).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn get_free_slots<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(trainer_id): Path<Uuid>,
    Query(query): Query<FreeSlotsQuery>,
) -> Response {
    error_handler(
        (async {
            let duration = match (query.offering_id, query.duration_minutes) {
                (Some(offering_id), _) => SlotDuration::Offering(offering_id),
                (None, Some(minutes)) => SlotDuration::Minutes(minutes),
                (None, None) => {
                    return Err(ServiceError::ValidationError(Arc::new([
                        ValidationFailureItem::MissingField("duration_minutes".into()),
                    ]))
                    .into())
                }
            };
            let slots = rest_state
                .scheduling_service()
                .free_slots(trainer_id, query.date, duration, ().into(), None)
                .await?;
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(slots.as_ref()).unwrap()))
                .unwrap())
        })
        .await,
    )
}
