use std::sync::Arc;

mod appointment;
mod availability;
mod catalog;
mod trainer;

use axum::{body::Body, response::Response, Router};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Service error")]
    ServiceError(#[from] service::ServiceError),

    #[error("Inconsistent id. Got {0} in path but {1} in body")]
    InconsistentId(Uuid, Uuid),
}

fn error_handler(result: Result<Response, RestError>) -> Response {
    match result {
        Ok(response) => response,
        Err(err @ RestError::InconsistentId(_, _)) => Response::builder()
            .status(400)
            .body(Body::new(err.to_string()))
            .unwrap(),
        Err(RestError::ServiceError(service::ServiceError::Forbidden)) => {
            Response::builder().status(403).body(Body::empty()).unwrap()
        }
        Err(RestError::ServiceError(service::ServiceError::DatabaseQueryError(e))) => {
            Response::builder()
                .status(500)
                .body(Body::new(e.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(service::ServiceError::EntityNotFound(id))) => {
            Response::builder()
                .status(404)
                .body(Body::new(id.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::ValidationError(_))) => {
            Response::builder()
                .status(422)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::IdSetOnCreate)) => {
            Response::builder()
                .status(422)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::VersionSetOnCreate)) => {
            Response::builder()
                .status(422)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::TimeOrderWrong(_, _))) => {
            Response::builder()
                .status(422)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::OverlappingTimeRange)) => {
            Response::builder()
                .status(409)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::OutsideWorkingHours)) => {
            Response::builder()
                .status(409)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::TimeSlotTaken)) => {
            Response::builder()
                .status(409)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
        Err(RestError::ServiceError(err @ service::ServiceError::InternalError)) => {
            Response::builder()
                .status(500)
                .body(Body::new(err.to_string()))
                .unwrap()
        }
    }
}

pub trait RestStateDef: Clone + Send + Sync + 'static {
    type Transaction: dao::Transaction + 'static;
    type TrainerService: service::trainer::TrainerService<Context = (), Transaction = Self::Transaction>
        + Send
        + Sync
        + 'static;
    type AvailabilityService: service::availability::AvailabilityService<Context = (), Transaction = Self::Transaction>
        + Send
        + Sync
        + 'static;
    type CatalogService: service::catalog::CatalogService<Context = (), Transaction = Self::Transaction>
        + Send
        + Sync
        + 'static;
    type AppointmentService: service::appointment::AppointmentService<Context = (), Transaction = Self::Transaction>
        + Send
        + Sync
        + 'static;
    type SchedulingService: service::scheduling::SchedulingService<Context = (), Transaction = Self::Transaction>
        + Send
        + Sync
        + 'static;

    fn trainer_service(&self) -> Arc<Self::TrainerService>;
    fn availability_service(&self) -> Arc<Self::AvailabilityService>;
    fn catalog_service(&self) -> Arc<Self::CatalogService>;
    fn appointment_service(&self) -> Arc<Self::AppointmentService>;
    fn scheduling_service(&self) -> Arc<Self::SchedulingService>;
}

pub async fn start_server<RestState: RestStateDef>(rest_state: RestState) {
    let app = Router::new()
        .nest("/trainer", trainer::generate_route())
        .nest("/availability", availability::generate_route())
        .nest("/offering", catalog::generate_route())
        .nest("/appointment", appointment::generate_route())
        .with_state(rest_state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000")
        .await
        .expect("Could not bind server");
    axum::serve(listener, app)
        .await
        .expect("Could not start server");
}
