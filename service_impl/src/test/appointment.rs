use std::sync::Arc;

use crate::appointment::AppointmentServiceImpl;
use crate::test::error_test::*;
use dao::appointment::MockAppointmentDao;
use dao::availability::{AvailabilityEntity, MockAvailabilityDao};
use dao::{MockTransaction, MockTransactionDao};
use fitdesk_utils::DayOfWeek;
use mockall::predicate::{always, eq};
use service::appointment::{Appointment, AppointmentService, AppointmentStatus};
use service::catalog::{MockCatalogService, ServiceOffering};
use service::clock::MockClockService;
use service::permission::MockPermissionService;
use service::trainer::MockTrainerService;
use service::uuid_service::MockUuidService;
use service::ValidationFailureItem;
use time::macros::{datetime, time};
use uuid::{uuid, Uuid};

pub fn default_trainer_id() -> Uuid {
    uuid!("0a47e354-b7c9-47b1-b30a-2d4e8a0d4e54")
}
pub fn default_offering_id() -> Uuid {
    uuid!("d0a5b6ab-9d1a-4b34-b7dc-0f67b5c5e9cc")
}
pub fn default_appointment_id() -> Uuid {
    uuid!("522c46c6-1062-4ce2-8fdf-c9530dcc7fc2")
}
pub fn other_appointment_id() -> Uuid {
    uuid!("84e761e7-4c32-4da3-a1e2-908c657938ac")
}
pub fn default_version() -> Uuid {
    uuid!("21d3d4fd-4b77-4f24-9e09-e9e7a8b5c17d")
}
pub fn generated_id() -> Uuid {
    uuid!("7a3ad3e8-7d35-4fbb-bb20-3f0cb6c6d0d2")
}
pub fn generated_version() -> Uuid {
    uuid!("8e6a9f00-07a3-4a07-9f7c-1f4b3a2a6a11")
}

pub fn default_offering() -> ServiceOffering {
    ServiceOffering {
        id: default_offering_id(),
        name: "Personal Training".into(),
        duration_minutes: 60,
        price_cents: 5000,
        deleted: None,
        version: default_version(),
    }
}

/// 2024-01-01 is a Monday.
pub fn new_appointment() -> Appointment {
    Appointment {
        id: Uuid::nil(),
        trainer_id: default_trainer_id(),
        offering_id: default_offering_id(),
        member_id: "MEMBER1".into(),
        start: datetime!(2024-01-01 09:00),
        end: datetime!(2024-01-01 09:00),
        price_cents: 0,
        status: AppointmentStatus::Pending,
        created: None,
        deleted: None,
        version: Uuid::nil(),
    }
}

pub fn default_appointment_entity() -> dao::appointment::AppointmentEntity {
    dao::appointment::AppointmentEntity {
        id: default_appointment_id(),
        trainer_id: default_trainer_id(),
        offering_id: default_offering_id(),
        member_id: "MEMBER1".into(),
        start: datetime!(2024-01-01 09:00),
        end: datetime!(2024-01-01 10:00),
        price_cents: 5000,
        status: dao::appointment::AppointmentStatus::Pending,
        created: generate_default_datetime(),
        deleted: None,
        version: default_version(),
    }
}

pub fn default_window() -> AvailabilityEntity {
    AvailabilityEntity {
        id: uuid!("f3a6573e-3a9f-4f70-ad2b-57a7e6a1a2a5"),
        trainer_id: default_trainer_id(),
        day_of_week: DayOfWeek::Monday,
        start_time: time!(08:00),
        end_time: time!(12:00),
        deleted: None,
        version: default_version(),
    }
}

pub struct AppointmentServiceDependencies {
    pub appointment_dao: MockAppointmentDao,
    pub availability_dao: MockAvailabilityDao,
    pub trainer_service: MockTrainerService,
    pub catalog_service: MockCatalogService,
    pub permission_service: MockPermissionService,
    pub clock_service: MockClockService,
    pub uuid_service: MockUuidService,
    pub transaction_dao: MockTransactionDao,
}
impl crate::appointment::AppointmentServiceDeps for AppointmentServiceDependencies {
    type Context = ();
    type Transaction = MockTransaction;
    type AppointmentDao = MockAppointmentDao;
    type AvailabilityDao = MockAvailabilityDao;
    type TrainerService = MockTrainerService;
    type CatalogService = MockCatalogService;
    type PermissionService = MockPermissionService;
    type ClockService = MockClockService;
    type UuidService = MockUuidService;
    type TransactionDao = MockTransactionDao;
}
impl AppointmentServiceDependencies {
    pub fn build_service(self) -> AppointmentServiceImpl<AppointmentServiceDependencies> {
        AppointmentServiceImpl {
            appointment_dao: self.appointment_dao.into(),
            availability_dao: self.availability_dao.into(),
            trainer_service: self.trainer_service.into(),
            catalog_service: self.catalog_service.into(),
            permission_service: self.permission_service.into(),
            clock_service: self.clock_service.into(),
            uuid_service: self.uuid_service.into(),
            transaction_dao: self.transaction_dao.into(),
        }
    }
}

pub fn build_dependencies(permission: bool, role: &'static str) -> AppointmentServiceDependencies {
    let appointment_dao = MockAppointmentDao::new();
    let availability_dao = MockAvailabilityDao::new();
    let mut trainer_service = MockTrainerService::new();
    trainer_service
        .expect_exists()
        .returning(|_, _, _| Ok(true));
    let mut catalog_service = MockCatalogService::new();
    catalog_service
        .expect_get_offering()
        .with(eq(default_offering_id()), always(), always())
        .returning(|_, _, _| Ok(default_offering()));
    let mut permission_service = MockPermissionService::new();
    permission_service
        .expect_check_permission()
        .with(eq(role), eq(().auth()))
        .returning(move |_, _| {
            if permission {
                Ok(())
            } else {
                Err(service::ServiceError::Forbidden)
            }
        });
    permission_service
        .expect_check_permission()
        .returning(move |_, _| Err(service::ServiceError::Forbidden));
    let mut clock_service = MockClockService::new();
    clock_service
        .expect_date_time_now()
        .returning(generate_default_datetime);
    let uuid_service = MockUuidService::new();
    let mut transaction_dao = MockTransactionDao::new();
    transaction_dao
        .expect_use_transaction()
        .returning(|_| Ok(MockTransaction));
    transaction_dao.expect_commit().returning(|_| Ok(()));

    AppointmentServiceDependencies {
        appointment_dao,
        availability_dao,
        trainer_service,
        catalog_service,
        permission_service,
        clock_service,
        uuid_service,
        transaction_dao,
    }
}

fn expect_windows(
    dependencies: &mut AppointmentServiceDependencies,
    windows: Arc<[AvailabilityEntity]>,
) {
    dependencies
        .availability_dao
        .expect_find_by_trainer_and_day()
        .returning(move |_, _, _| Ok(windows.clone()));
}

fn expect_in_range(
    dependencies: &mut AppointmentServiceDependencies,
    appointments: Arc<[dao::appointment::AppointmentEntity]>,
) {
    dependencies
        .appointment_dao
        .expect_find_by_trainer_in_range()
        .returning(move |_, _, _, _| Ok(appointments.clone()));
}

fn expect_generated_uuids(dependencies: &mut AppointmentServiceDependencies) {
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("appointment-id"))
        .returning(|_| generated_id());
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("appointment-version"))
        .returning(|_| generated_version());
}

fn overlapping(status: dao::appointment::AppointmentStatus) -> dao::appointment::AppointmentEntity {
    dao::appointment::AppointmentEntity {
        id: other_appointment_id(),
        start: datetime!(2024-01-01 09:30),
        end: datetime!(2024-01-01 10:30),
        status,
        ..default_appointment_entity()
    }
}

#[tokio::test]
async fn test_create_appointment() {
    let mut dependencies = build_dependencies(true, "admin");
    expect_windows(&mut dependencies, Arc::new([default_window()]));
    expect_in_range(&mut dependencies, Arc::new([]));
    expect_generated_uuids(&mut dependencies);
    dependencies
        .appointment_dao
        .expect_create()
        .withf(|entity, process, _| {
            entity.id == generated_id()
                && entity.version == generated_version()
                && entity.end == datetime!(2024-01-01 10:00)
                && entity.price_cents == 5000
                && entity.status == dao::appointment::AppointmentStatus::Pending
                && entity.created == generate_default_datetime()
                && process == "appointment-service"
        })
        .returning(|_, _, _| Ok(()));
    let service = dependencies.build_service();

    let appointment = service
        .create(&new_appointment(), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(appointment.id, generated_id());
    assert_eq!(appointment.end, datetime!(2024-01-01 10:00));
    assert_eq!(appointment.price_cents, 5000);
    assert_eq!(appointment.status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn test_create_appointment_as_member_for_self() {
    let mut dependencies = build_dependencies(true, "member");
    dependencies
        .permission_service
        .expect_current_user_id()
        .returning(|_| Ok(Some("MEMBER1".into())));
    expect_windows(&mut dependencies, Arc::new([default_window()]));
    expect_in_range(&mut dependencies, Arc::new([]));
    expect_generated_uuids(&mut dependencies);
    dependencies
        .appointment_dao
        .expect_create()
        .returning(|_, _, _| Ok(()));
    let service = dependencies.build_service();

    let result = service.create(&new_appointment(), ().auth(), None).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_create_appointment_as_member_for_other_member() {
    let mut dependencies = build_dependencies(true, "member");
    dependencies
        .permission_service
        .expect_current_user_id()
        .returning(|_| Ok(Some("MEMBER2".into())));
    let service = dependencies.build_service();

    let result = service.create(&new_appointment(), ().auth(), None).await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_create_appointment_id_set() {
    let dependencies = build_dependencies(true, "admin");
    let service = dependencies.build_service();

    let result = service
        .create(
            &Appointment {
                id: default_appointment_id(),
                ..new_appointment()
            },
            ().auth(),
            None,
        )
        .await;
    test_zero_id_error(&result);
}

#[tokio::test]
async fn test_create_appointment_version_set() {
    let dependencies = build_dependencies(true, "admin");
    let service = dependencies.build_service();

    let result = service
        .create(
            &Appointment {
                version: default_version(),
                ..new_appointment()
            },
            ().auth(),
            None,
        )
        .await;
    test_zero_version_error(&result);
}

#[tokio::test]
async fn test_create_appointment_empty_member_id() {
    let dependencies = build_dependencies(true, "admin");
    let service = dependencies.build_service();

    let result = service
        .create(
            &Appointment {
                member_id: "".into(),
                ..new_appointment()
            },
            ().auth(),
            None,
        )
        .await;
    test_validation_error(
        &result,
        &ValidationFailureItem::MissingField("member_id".into()),
        1,
    );
}

#[tokio::test]
async fn test_create_appointment_unknown_offering() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies.catalog_service.checkpoint();
    dependencies
        .catalog_service
        .expect_get_offering()
        .returning(|id, _, _| Err(service::ServiceError::EntityNotFound(id)));
    let service = dependencies.build_service();

    let result = service.create(&new_appointment(), ().auth(), None).await;
    test_not_found(&result, &default_offering_id());
}

#[tokio::test]
async fn test_create_appointment_unknown_trainer() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies.trainer_service.checkpoint();
    dependencies
        .trainer_service
        .expect_exists()
        .returning(|_, _, _| Ok(false));
    let service = dependencies.build_service();

    let result = service.create(&new_appointment(), ().auth(), None).await;
    test_not_found(&result, &default_trainer_id());
}

#[tokio::test]
async fn test_create_appointment_outside_working_hours() {
    let mut dependencies = build_dependencies(true, "admin");
    expect_windows(
        &mut dependencies,
        Arc::new([AvailabilityEntity {
            start_time: time!(10:00),
            end_time: time!(12:00),
            ..default_window()
        }]),
    );
    let service = dependencies.build_service();

    let result = service.create(&new_appointment(), ().auth(), None).await;
    test_outside_working_hours(&result);
}

#[tokio::test]
async fn test_create_appointment_not_fully_contained_in_window() {
    // Starts inside the window but runs past its end.
    let mut dependencies = build_dependencies(true, "admin");
    expect_windows(
        &mut dependencies,
        Arc::new([AvailabilityEntity {
            start_time: time!(08:00),
            end_time: time!(09:30),
            ..default_window()
        }]),
    );
    let service = dependencies.build_service();

    let result = service.create(&new_appointment(), ().auth(), None).await;
    test_outside_working_hours(&result);
}

#[tokio::test]
async fn test_create_appointment_ending_at_window_end() {
    let mut dependencies = build_dependencies(true, "admin");
    expect_windows(
        &mut dependencies,
        Arc::new([AvailabilityEntity {
            start_time: time!(08:00),
            end_time: time!(10:00),
            ..default_window()
        }]),
    );
    expect_in_range(&mut dependencies, Arc::new([]));
    expect_generated_uuids(&mut dependencies);
    dependencies
        .appointment_dao
        .expect_create()
        .returning(|_, _, _| Ok(()));
    let service = dependencies.build_service();

    let result = service.create(&new_appointment(), ().auth(), None).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_create_appointment_crossing_midnight() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies.catalog_service.checkpoint();
    dependencies
        .catalog_service
        .expect_get_offering()
        .returning(|_, _, _| {
            Ok(ServiceOffering {
                duration_minutes: 120,
                ..default_offering()
            })
        });
    let service = dependencies.build_service();

    let result = service
        .create(
            &Appointment {
                start: datetime!(2024-01-01 23:00),
                ..new_appointment()
            },
            ().auth(),
            None,
        )
        .await;
    test_outside_working_hours(&result);
}

#[tokio::test]
async fn test_create_appointment_past_calendar_ceiling() {
    // The computed end would not even be representable.
    let dependencies = build_dependencies(true, "admin");
    let service = dependencies.build_service();

    let result = service
        .create(
            &Appointment {
                start: datetime!(9999-12-31 23:30),
                ..new_appointment()
            },
            ().auth(),
            None,
        )
        .await;
    test_outside_working_hours(&result);
}

#[tokio::test]
async fn test_create_appointment_blocked_by_pending() {
    let mut dependencies = build_dependencies(true, "admin");
    expect_windows(&mut dependencies, Arc::new([default_window()]));
    expect_in_range(
        &mut dependencies,
        Arc::new([overlapping(dao::appointment::AppointmentStatus::Pending)]),
    );
    let service = dependencies.build_service();

    let result = service.create(&new_appointment(), ().auth(), None).await;
    test_time_slot_taken(&result);
}

#[tokio::test]
async fn test_create_appointment_blocked_by_approved() {
    let mut dependencies = build_dependencies(true, "admin");
    expect_windows(&mut dependencies, Arc::new([default_window()]));
    expect_in_range(
        &mut dependencies,
        Arc::new([overlapping(dao::appointment::AppointmentStatus::Approved)]),
    );
    let service = dependencies.build_service();

    let result = service.create(&new_appointment(), ().auth(), None).await;
    test_time_slot_taken(&result);
}

#[tokio::test]
async fn test_create_appointment_rejected_does_not_block() {
    let mut dependencies = build_dependencies(true, "admin");
    expect_windows(&mut dependencies, Arc::new([default_window()]));
    expect_in_range(
        &mut dependencies,
        Arc::new([overlapping(dao::appointment::AppointmentStatus::Rejected)]),
    );
    expect_generated_uuids(&mut dependencies);
    dependencies
        .appointment_dao
        .expect_create()
        .returning(|_, _, _| Ok(()));
    let service = dependencies.build_service();

    let result = service.create(&new_appointment(), ().auth(), None).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_approve_appointment() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies
        .appointment_dao
        .expect_find_by_id()
        .with(eq(default_appointment_id()), always())
        .returning(|_, _| Ok(Some(default_appointment_entity())));
    expect_in_range(&mut dependencies, Arc::new([]));
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("appointment-version"))
        .returning(|_| generated_version());
    dependencies
        .appointment_dao
        .expect_update()
        .withf(|entity, _, _| {
            entity.status == dao::appointment::AppointmentStatus::Approved
                && entity.version == generated_version()
        })
        .returning(|_, _, _| Ok(()));
    let service = dependencies.build_service();

    let appointment = service
        .approve(default_appointment_id(), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Approved);
}

#[tokio::test]
async fn test_approve_appointment_conflicting_approved_wins() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies
        .appointment_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_appointment_entity())));
    expect_in_range(
        &mut dependencies,
        Arc::new([overlapping(dao::appointment::AppointmentStatus::Approved)]),
    );
    dependencies.appointment_dao.expect_update().never();
    let service = dependencies.build_service();

    let result = service
        .approve(default_appointment_id(), ().auth(), None)
        .await;
    test_time_slot_taken(&result);
}

#[tokio::test]
async fn test_approve_appointment_pending_rival_does_not_veto() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies
        .appointment_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_appointment_entity())));
    expect_in_range(
        &mut dependencies,
        Arc::new([overlapping(dao::appointment::AppointmentStatus::Pending)]),
    );
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("appointment-version"))
        .returning(|_| generated_version());
    dependencies
        .appointment_dao
        .expect_update()
        .returning(|_, _, _| Ok(()));
    let service = dependencies.build_service();

    let result = service
        .approve(default_appointment_id(), ().auth(), None)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_approve_appointment_ignores_itself() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies
        .appointment_dao
        .expect_find_by_id()
        .returning(|_, _| {
            Ok(Some(dao::appointment::AppointmentEntity {
                status: dao::appointment::AppointmentStatus::Approved,
                ..default_appointment_entity()
            }))
        });
    expect_in_range(
        &mut dependencies,
        Arc::new([dao::appointment::AppointmentEntity {
            status: dao::appointment::AppointmentStatus::Approved,
            ..default_appointment_entity()
        }]),
    );
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("appointment-version"))
        .returning(|_| generated_version());
    dependencies
        .appointment_dao
        .expect_update()
        .returning(|_, _, _| Ok(()));
    let service = dependencies.build_service();

    let result = service
        .approve(default_appointment_id(), ().auth(), None)
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_approve_appointment_not_found() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies
        .appointment_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(None));
    let service = dependencies.build_service();

    let result = service
        .approve(default_appointment_id(), ().auth(), None)
        .await;
    test_not_found(&result, &default_appointment_id());
}

#[tokio::test]
async fn test_reject_appointment_always_succeeds() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies
        .appointment_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_appointment_entity())));
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("appointment-version"))
        .returning(|_| generated_version());
    dependencies
        .appointment_dao
        .expect_update()
        .withf(|entity, _, _| entity.status == dao::appointment::AppointmentStatus::Rejected)
        .returning(|_, _, _| Ok(()));
    let service = dependencies.build_service();

    let appointment = service
        .reject(default_appointment_id(), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Rejected);
}

#[tokio::test]
async fn test_delete_appointment() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies
        .appointment_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(Some(default_appointment_entity())));
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("appointment-version"))
        .returning(|_| generated_version());
    dependencies
        .appointment_dao
        .expect_update()
        .withf(|entity, _, _| entity.deleted == Some(generate_default_datetime()))
        .returning(|_, _, _| Ok(()));
    let service = dependencies.build_service();

    service
        .delete(default_appointment_id(), ().auth(), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_appointment_not_found() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies
        .appointment_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(None));
    let service = dependencies.build_service();

    let result = service.get(default_appointment_id(), ().auth(), None).await;
    test_not_found(&result, &default_appointment_id());
}

#[tokio::test]
async fn test_get_for_member_as_owner() {
    let mut dependencies = build_dependencies(true, "member");
    dependencies
        .permission_service
        .expect_current_user_id()
        .returning(|_| Ok(Some("MEMBER1".into())));
    dependencies
        .appointment_dao
        .expect_find_by_member()
        .with(eq("MEMBER1"), always())
        .returning(|_, _| Ok(Arc::new([default_appointment_entity()])));
    let service = dependencies.build_service();

    let appointments = service
        .get_for_member("MEMBER1", ().auth(), None)
        .await
        .unwrap();
    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].id, default_appointment_id());
}

#[tokio::test]
async fn test_get_for_member_as_other_member() {
    let mut dependencies = build_dependencies(true, "member");
    dependencies
        .permission_service
        .expect_current_user_id()
        .returning(|_| Ok(Some("MEMBER2".into())));
    let service = dependencies.build_service();

    let result = service.get_for_member("MEMBER1", ().auth(), None).await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_get_all_forbidden_for_member() {
    let dependencies = build_dependencies(true, "member");
    let service = dependencies.build_service();

    let result = service.get_all(().auth(), None).await;
    test_forbidden(&result);
}
