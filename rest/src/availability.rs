use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use service::availability::AvailabilityService;
use uuid::Uuid;

use crate::{error_handler, RestStateDef};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}
impl From<fitdesk_utils::DayOfWeek> for DayOfWeek {
    fn from(day_of_week: fitdesk_utils::DayOfWeek) -> Self {
        match day_of_week {
            fitdesk_utils::DayOfWeek::Monday => Self::Monday,
            fitdesk_utils::DayOfWeek::Tuesday => Self::Tuesday,
            fitdesk_utils::DayOfWeek::Wednesday => Self::Wednesday,
            fitdesk_utils::DayOfWeek::Thursday => Self::Thursday,
            fitdesk_utils::DayOfWeek::Friday => Self::Friday,
            fitdesk_utils::DayOfWeek::Saturday => Self::Saturday,
            fitdesk_utils::DayOfWeek::Sunday => Self::Sunday,
        }
    }
}
impl From<DayOfWeek> for fitdesk_utils::DayOfWeek {
    fn from(day_of_week: DayOfWeek) -> Self {
        match day_of_week {
            DayOfWeek::Monday => Self::Monday,
            DayOfWeek::Tuesday => Self::Tuesday,
            DayOfWeek::Wednesday => Self::Wednesday,
            DayOfWeek::Thursday => Self::Thursday,
            DayOfWeek::Friday => Self::Friday,
            DayOfWeek::Saturday => Self::Saturday,
            DayOfWeek::Sunday => Self::Sunday,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindowTO {
    #[serde(default)]
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start_time: time::Time,
    pub end_time: time::Time,
    #[serde(default)]
    pub deleted: Option<time::PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}
impl From<&service::availability::TimeWindow> for TimeWindowTO {
    fn from(window: &service::availability::TimeWindow) -> Self {
        Self {
            id: window.id,
            trainer_id: window.trainer_id,
            day_of_week: window.day_of_week.into(),
            start_time: window.start_time,
            end_time: window.end_time,
            deleted: window.deleted,
            version: window.version,
        }
    }
}
impl From<&TimeWindowTO> for service::availability::TimeWindow {
    fn from(window: &TimeWindowTO) -> Self {
        Self {
            id: window.id,
            trainer_id: window.trainer_id,
            day_of_week: window.day_of_week.into(),
            start_time: window.start_time,
            end_time: window.end_time,
            deleted: window.deleted,
            version: window.version,
        }
    }
}

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/trainer/{id}", get(get_for_trainer::<RestState>))
        .route("/", post(create_window::<RestState>))
        .route("/{id}", delete(delete_window::<RestState>))
}

pub async fn get_for_trainer<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(trainer_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let windows: Arc<[TimeWindowTO]> = rest_state
                .availability_service()
                .get_for_trainer(trainer_id, ().into(), None)
                .await?
                .iter()
                .map(TimeWindowTO::from)
                .collect();
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&windows).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn create_window<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Json(window): Json<TimeWindowTO>,
) -> Response {
    error_handler(
        (async {
            let window = TimeWindowTO::from(
                &rest_state
                    .availability_service()
                    .create(&(&window).into(), ().into(), None)
                    .await?,
            );
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&window).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn delete_window<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(window_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            rest_state
                .availability_service()
                .delete(window_id, ().into(), None)
                .await?;
            Ok(Response::builder().status(204).body(Body::empty()).unwrap())
        })
        .await,
    )
}
