use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use service::appointment::AppointmentService;
use uuid::Uuid;

use crate::{error_handler, RestStateDef};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum AppointmentStatusTO {
    Pending,
    Approved,
    Rejected,
}
impl From<service::appointment::AppointmentStatus> for AppointmentStatusTO {
    fn from(status: service::appointment::AppointmentStatus) -> Self {
        match status {
            service::appointment::AppointmentStatus::Pending => Self::Pending,
            service::appointment::AppointmentStatus::Approved => Self::Approved,
            service::appointment::AppointmentStatus::Rejected => Self::Rejected,
        }
    }
}
impl From<AppointmentStatusTO> for service::appointment::AppointmentStatus {
    fn from(status: AppointmentStatusTO) -> Self {
        match status {
            AppointmentStatusTO::Pending => Self::Pending,
            AppointmentStatusTO::Approved => Self::Approved,
            AppointmentStatusTO::Rejected => Self::Rejected,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentTO {
    #[serde(default)]
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub offering_id: Uuid,
    pub member_id: Arc<str>,
    pub start: time::PrimitiveDateTime,
    #[serde(default)]
    pub end: Option<time::PrimitiveDateTime>,
    #[serde(default)]
    pub price_cents: i64,
    #[serde(default = "default_status")]
    pub status: AppointmentStatusTO,
    #[serde(default)]
    pub created: Option<time::PrimitiveDateTime>,
    #[serde(default)]
    pub deleted: Option<time::PrimitiveDateTime>,
    #[serde(rename = "$version")]
    #[serde(default)]
    pub version: Uuid,
}
fn default_status() -> AppointmentStatusTO {
    AppointmentStatusTO::Pending
}
impl From<&service::appointment::Appointment> for AppointmentTO {
    fn from(appointment: &service::appointment::Appointment) -> Self {
        Self {
            id: appointment.id,
            trainer_id: appointment.trainer_id,
            offering_id: appointment.offering_id,
            member_id: appointment.member_id.clone(),
            start: appointment.start,
            end: Some(appointment.end),
            price_cents: appointment.price_cents,
            status: appointment.status.into(),
            created: appointment.created,
            deleted: appointment.deleted,
            version: appointment.version,
        }
    }
}
impl From<&AppointmentTO> for service::appointment::Appointment {
    fn from(appointment: &AppointmentTO) -> Self {
        Self {
            id: appointment.id,
            trainer_id: appointment.trainer_id,
            offering_id: appointment.offering_id,
            member_id: appointment.member_id.clone(),
            start: appointment.start,
            // create() recomputes the end from the offering duration.
            end: appointment.end.unwrap_or(appointment.start),
            price_cents: appointment.price_cents,
            status: appointment.status.into(),
            created: appointment.created,
            deleted: appointment.deleted,
            version: appointment.version,
        }
    }
}

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/", get(get_all_appointments::<RestState>))
        .route("/", post(create_appointment::<RestState>))
        .route("/{id}", get(get_appointment::<RestState>))
        .route("/{id}", delete(delete_appointment::<RestState>))
        .route("/{id}/approve", post(approve_appointment::<RestState>))
        .route("/{id}/reject", post(reject_appointment::<RestState>))
        .route(
            "/member/{member_id}",
            get(get_appointments_for_member::<RestState>),
        )
}

pub async fn get_all_appointments<RestState: RestStateDef>(
    rest_state: State<RestState>,
) -> Response {
    error_handler(
        (async {
            let appointments: Arc<[AppointmentTO]> = rest_state
                .appointment_service()
                .get_all(().into(), None)
                .await?
                .iter()
                .map(AppointmentTO::from)
                .collect();
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&appointments).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn get_appointment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(appointment_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let appointment = AppointmentTO::from(
                &rest_state
                    .appointment_service()
                    .get(appointment_id, ().into(), None)
                    .await?,
            );
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&appointment).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn get_appointments_for_member<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(member_id): Path<String>,
) -> Response {
    error_handler(
        (async {
            let appointments: Arc<[AppointmentTO]> = rest_state
                .appointment_service()
                .get_for_member(&member_id, ().into(), None)
                .await?
                .iter()
                .map(AppointmentTO::from)
                .collect();
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&appointments).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn create_appointment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Json(appointment): Json<AppointmentTO>,
) -> Response {
    error_handler(
        (async {
            let appointment = AppointmentTO::from(
                &rest_state
                    .appointment_service()
                    .create(&(&appointment).into(), ().into(), None)
                    .await?,
            );
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&appointment).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn approve_appointment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(appointment_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let appointment = AppointmentTO::from(
                &rest_state
                    .appointment_service()
                    .approve(appointment_id, ().into(), None)
                    .await?,
            );
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&appointment).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn reject_appointment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(appointment_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let appointment = AppointmentTO::from(
                &rest_state
                    .appointment_service()
                    .reject(appointment_id, ().into(), None)
                    .await?,
            );
            Ok(Response::builder()
                .status(200)
                .body(Body::new(serde_json::to_string(&appointment).unwrap()))
                .unwrap())
        })
        .await,
    )
}

pub async fn delete_appointment<RestState: RestStateDef>(
    rest_state: State<RestState>,
    Path(appointment_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            rest_state
                .appointment_service()
                .delete(appointment_id, ().into(), None)
                .await?;
            Ok(Response::builder().status(204).body(Body::empty()).unwrap())
        })
        .await,
    )
}
