use std::sync::Arc;

use crate::availability::AvailabilityServiceImpl;
use crate::test::error_test::*;
use dao::availability::{AvailabilityEntity, MockAvailabilityDao};
use dao::{MockTransaction, MockTransactionDao};
use fitdesk_utils::DayOfWeek;
use mockall::predicate::{always, eq};
use service::availability::{AvailabilityService, TimeWindow};
use service::clock::MockClockService;
use service::permission::MockPermissionService;
use service::uuid_service::MockUuidService;
use time::Time;
use uuid::{uuid, Uuid};

pub fn default_trainer_id() -> Uuid {
    uuid!("0a47e354-b7c9-47b1-b30a-2d4e8a0d4e54")
}
pub fn default_window_id() -> Uuid {
    uuid!("f3a6573e-3a9f-4f70-ad2b-57a7e6a1a2a5")
}
pub fn default_version() -> Uuid {
    uuid!("21d3d4fd-4b77-4f24-9e09-e9e7a8b5c17d")
}
pub fn generated_window_id() -> Uuid {
    uuid!("7a3ad3e8-7d35-4fbb-bb20-3f0cb6c6d0d2")
}
pub fn generated_version() -> Uuid {
    uuid!("8e6a9f00-07a3-4a07-9f7c-1f4b3a2a6a11")
}

pub fn default_time_window() -> TimeWindow {
    TimeWindow {
        id: default_window_id(),
        trainer_id: default_trainer_id(),
        day_of_week: DayOfWeek::Monday,
        start_time: Time::from_hms(8, 0, 0).unwrap(),
        end_time: Time::from_hms(12, 0, 0).unwrap(),
        deleted: None,
        version: default_version(),
    }
}
pub fn default_availability_entity() -> AvailabilityEntity {
    AvailabilityEntity {
        id: default_window_id(),
        trainer_id: default_trainer_id(),
        day_of_week: DayOfWeek::Monday,
        start_time: Time::from_hms(8, 0, 0).unwrap(),
        end_time: Time::from_hms(12, 0, 0).unwrap(),
        deleted: None,
        version: default_version(),
    }
}

pub struct AvailabilityServiceDependencies {
    pub availability_dao: MockAvailabilityDao,
    pub permission_service: MockPermissionService,
    pub clock_service: MockClockService,
    pub uuid_service: MockUuidService,
    pub transaction_dao: MockTransactionDao,
}
impl AvailabilityServiceDependencies {
    pub fn build_service(
        self,
    ) -> AvailabilityServiceImpl<
        MockAvailabilityDao,
        MockPermissionService,
        MockClockService,
        MockUuidService,
        MockTransactionDao,
    > {
        AvailabilityServiceImpl::new(
            self.availability_dao.into(),
            self.permission_service.into(),
            self.clock_service.into(),
            self.uuid_service.into(),
            self.transaction_dao.into(),
        )
    }
}

pub fn build_dependencies(permission: bool, role: &'static str) -> AvailabilityServiceDependencies {
    let availability_dao = MockAvailabilityDao::new();
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

    AvailabilityServiceDependencies {
        availability_dao,
        permission_service,
        clock_service,
        uuid_service,
        transaction_dao,
    }
}

#[tokio::test]
async fn test_get_for_trainer() {
    let mut dependencies = build_dependencies(true, "member");
    dependencies
        .availability_dao
        .expect_find_by_trainer()
        .with(eq(default_trainer_id()), always())
        .returning(|_, _| Ok(Arc::new([default_availability_entity()])));
    let service = dependencies.build_service();

    let windows = service
        .get_for_trainer(default_trainer_id(), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(windows.as_ref(), &[default_time_window()]);
}

#[tokio::test]
async fn test_get_for_trainer_forbidden() {
    let dependencies = build_dependencies(false, "member");
    let service = dependencies.build_service();

    let result = service
        .get_for_trainer(default_trainer_id(), ().auth(), None)
        .await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_create_window() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies
        .availability_dao
        .expect_find_by_trainer_and_day()
        .with(eq(default_trainer_id()), eq(DayOfWeek::Monday), always())
        .returning(|_, _, _| Ok(Arc::new([])));
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("availability-id"))
        .returning(|_| generated_window_id());
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("availability-version"))
        .returning(|_| generated_version());
    dependencies
        .availability_dao
        .expect_create()
        .withf(|entity, process, _| {
            entity.id == generated_window_id()
                && entity.version == generated_version()
                && process == "availability-service"
        })
        .returning(|_, _, _| Ok(()));
    let service = dependencies.build_service();

    let window = service
        .create(
            &TimeWindow {
                id: Uuid::nil(),
                version: Uuid::nil(),
                ..default_time_window()
            },
            ().auth(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(window.id, generated_window_id());
    assert_eq!(window.version, generated_version());
}

#[tokio::test]
async fn test_create_window_forbidden() {
    let dependencies = build_dependencies(false, "admin");
    let service = dependencies.build_service();

    let result = service
        .create(
            &TimeWindow {
                id: Uuid::nil(),
                version: Uuid::nil(),
                ..default_time_window()
            },
            ().auth(),
            None,
        )
        .await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_create_window_id_set() {
    let dependencies = build_dependencies(true, "admin");
    let service = dependencies.build_service();

    let result = service
        .create(
            &TimeWindow {
                version: Uuid::nil(),
                ..default_time_window()
            },
            ().auth(),
            None,
        )
        .await;
    test_zero_id_error(&result);
}

#[tokio::test]
async fn test_create_window_version_set() {
    let dependencies = build_dependencies(true, "admin");
    let service = dependencies.build_service();

    let result = service
        .create(
            &TimeWindow {
                id: Uuid::nil(),
                ..default_time_window()
            },
            ().auth(),
            None,
        )
        .await;
    test_zero_version_error(&result);
}

#[tokio::test]
async fn test_create_window_time_order_wrong() {
    let dependencies = build_dependencies(true, "admin");
    let service = dependencies.build_service();

    let result = service
        .create(
            &TimeWindow {
                id: Uuid::nil(),
                version: Uuid::nil(),
                start_time: Time::from_hms(12, 0, 0).unwrap(),
                end_time: Time::from_hms(8, 0, 0).unwrap(),
                ..default_time_window()
            },
            ().auth(),
            None,
        )
        .await;
    test_time_order_wrong(&result);
}

#[tokio::test]
async fn test_create_window_exact_duplicate() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies
        .availability_dao
        .expect_find_by_trainer_and_day()
        .returning(|_, _, _| Ok(Arc::new([default_availability_entity()])));
    let service = dependencies.build_service();

    let result = service
        .create(
            &TimeWindow {
                id: Uuid::nil(),
                version: Uuid::nil(),
                ..default_time_window()
            },
            ().auth(),
            None,
        )
        .await;
    test_overlapping_time_range_error(&result);
}

#[tokio::test]
async fn test_create_window_overlap_without_duplicate_is_allowed() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies
        .availability_dao
        .expect_find_by_trainer_and_day()
        .returning(|_, _, _| {
            Ok(Arc::new([AvailabilityEntity {
                start_time: Time::from_hms(10, 0, 0).unwrap(),
                end_time: Time::from_hms(14, 0, 0).unwrap(),
                ..default_availability_entity()
            }]))
        });
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("availability-id"))
        .returning(|_| generated_window_id());
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("availability-version"))
        .returning(|_| generated_version());
    dependencies
        .availability_dao
        .expect_create()
        .returning(|_, _, _| Ok(()));
    let service = dependencies.build_service();

    let result = service
        .create(
            &TimeWindow {
                id: Uuid::nil(),
                version: Uuid::nil(),
                ..default_time_window()
            },
            ().auth(),
            None,
        )
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_delete_window() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies
        .availability_dao
        .expect_find_by_id()
        .with(eq(default_window_id()), always())
        .returning(|_, _| Ok(Some(default_availability_entity())));
    dependencies
        .uuid_service
        .expect_new_uuid()
        .with(eq("availability-version"))
        .returning(|_| generated_version());
    dependencies
        .availability_dao
        .expect_update()
        .withf(|entity, _, _| {
            entity.deleted == Some(generate_default_datetime())
                && entity.version == generated_version()
        })
        .returning(|_, _, _| Ok(()));
    let service = dependencies.build_service();

    service
        .delete(default_window_id(), ().auth(), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_window_not_found() {
    let mut dependencies = build_dependencies(true, "admin");
    dependencies
        .availability_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(None));
    let service = dependencies.build_service();

    let result = service.delete(default_window_id(), ().auth(), None).await;
    test_not_found(&result, &default_window_id());
}
