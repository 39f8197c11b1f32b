use std::sync::Arc;

use dao_impl_sqlite::{
    appointment::AppointmentDaoImpl, availability::AvailabilityDaoImpl, catalog::CatalogDaoImpl,
    trainer::TrainerDaoImpl, PermissionDaoImpl, TransactionDaoImpl, TransactionImpl,
};
use sqlx::SqlitePool;
#[cfg(feature = "json_logging")]
use tracing_subscriber::fmt::format::FmtSpan;

type UserService = service_impl::UserServiceDev;
type Transaction = TransactionImpl;
type TransactionDao = TransactionDaoImpl;
type PermissionDao = PermissionDaoImpl;
type TrainerDao = TrainerDaoImpl;
type AvailabilityDao = AvailabilityDaoImpl;
type AppointmentDao = AppointmentDaoImpl;
type CatalogDao = CatalogDaoImpl;

type PermissionService = service_impl::PermissionServiceImpl<PermissionDao, UserService>;
type ClockService = service_impl::clock::ClockServiceImpl;
type UuidService = service_impl::uuid_service::UuidServiceImpl;
type TrainerService =
    service_impl::trainer::TrainerServiceImpl<TrainerDao, PermissionService, TransactionDao>;
type CatalogService =
    service_impl::catalog::CatalogServiceImpl<CatalogDao, PermissionService, TransactionDao>;
type AvailabilityService = service_impl::availability::AvailabilityServiceImpl<
    AvailabilityDao,
    PermissionService,
    ClockService,
    UuidService,
    TransactionDao,
>;

pub struct SchedulingServiceDependencies;
impl service_impl::scheduling::SchedulingServiceDeps for SchedulingServiceDependencies {
    type Context = ();
    type Transaction = Transaction;
    type AvailabilityDao = AvailabilityDao;
    type AppointmentDao = AppointmentDao;
    type TrainerService = TrainerService;
    type CatalogService = CatalogService;
    type PermissionService = PermissionService;
    type TransactionDao = TransactionDao;
}
type SchedulingService =
    service_impl::scheduling::SchedulingServiceImpl<SchedulingServiceDependencies>;

pub struct AppointmentServiceDependencies;
impl service_impl::appointment::AppointmentServiceDeps for AppointmentServiceDependencies {
    type Context = ();
    type Transaction = Transaction;
    type AppointmentDao = AppointmentDao;
    type AvailabilityDao = AvailabilityDao;
    type TrainerService = TrainerService;
    type CatalogService = CatalogService;
    type PermissionService = PermissionService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type AppointmentService =
    service_impl::appointment::AppointmentServiceImpl<AppointmentServiceDependencies>;

#[derive(Clone)]
pub struct RestStateImpl {
    trainer_service: Arc<TrainerService>,
    availability_service: Arc<AvailabilityService>,
    catalog_service: Arc<CatalogService>,
    appointment_service: Arc<AppointmentService>,
    scheduling_service: Arc<SchedulingService>,
}
impl rest::RestStateDef for RestStateImpl {
    type Transaction = Transaction;
    type TrainerService = TrainerService;
    type AvailabilityService = AvailabilityService;
    type CatalogService = CatalogService;
    type AppointmentService = AppointmentService;
    type SchedulingService = SchedulingService;

    fn trainer_service(&self) -> Arc<Self::TrainerService> {
        self.trainer_service.clone()
    }
    fn availability_service(&self) -> Arc<Self::AvailabilityService> {
        self.availability_service.clone()
    }
    fn catalog_service(&self) -> Arc<Self::CatalogService> {
        self.catalog_service.clone()
    }
    fn appointment_service(&self) -> Arc<Self::AppointmentService> {
        self.appointment_service.clone()
    }
    fn scheduling_service(&self) -> Arc<Self::SchedulingService> {
        self.scheduling_service.clone()
    }
}
impl RestStateImpl {
    pub fn new(pool: Arc<sqlx::Pool<sqlx::Sqlite>>) -> Self {
        let transaction_dao = Arc::new(TransactionDao::new(pool.clone()));
        let permission_dao = Arc::new(PermissionDao::new(pool.clone()));
        let trainer_dao = Arc::new(TrainerDao::new(pool.clone()));
        let availability_dao = Arc::new(AvailabilityDao::new(pool.clone()));
        let appointment_dao = Arc::new(AppointmentDao::new(pool.clone()));
        let catalog_dao = Arc::new(CatalogDao::new(pool.clone()));

        let permission_service = Arc::new(PermissionService::new(
            permission_dao,
            Arc::new(service_impl::UserServiceDev),
        ));
        let clock_service = Arc::new(ClockService {});
        let uuid_service = Arc::new(UuidService {});

        let trainer_service = Arc::new(TrainerService::new(
            trainer_dao,
            permission_service.clone(),
            transaction_dao.clone(),
        ));
        let catalog_service = Arc::new(CatalogService::new(
            catalog_dao,
            permission_service.clone(),
            transaction_dao.clone(),
        ));
        let availability_service = Arc::new(AvailabilityService::new(
            availability_dao.clone(),
            permission_service.clone(),
            clock_service.clone(),
            uuid_service.clone(),
            transaction_dao.clone(),
        ));
        let scheduling_service = Arc::new(SchedulingService {
            availability_dao: availability_dao.clone(),
            appointment_dao: appointment_dao.clone(),
            trainer_service: trainer_service.clone(),
            catalog_service: catalog_service.clone(),
            permission_service: permission_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let appointment_service = Arc::new(AppointmentService {
            appointment_dao,
            availability_dao,
            trainer_service: trainer_service.clone(),
            catalog_service: catalog_service.clone(),
            permission_service,
            clock_service,
            uuid_service,
            transaction_dao,
        });

        Self {
            trainer_service,
            availability_service,
            catalog_service,
            appointment_service,
            scheduling_service,
        }
    }
}

async fn create_admin_user(pool: Arc<SqlitePool>, username: &str) {
    use dao::PermissionDao;
    // On development create the DEVUSER and give it admin permissions.
    let permission_dao = PermissionDaoImpl::new(pool.clone());

    let users = permission_dao.all_users().await.expect("Expected users");
    let contains_admin_user = users.iter().any(|user| user.name.as_ref() == username);
    if !contains_admin_user {
        permission_dao
            .create_user(
                &dao::UserEntity {
                    name: username.into(),
                },
                "dev-first-start",
            )
            .await
            .unwrap_or_else(|_| panic!("Expected being able to create the {}", username));
        permission_dao
            .add_user_role(username, "admin", "dev-first-start")
            .await
            .unwrap_or_else(|_| panic!("Expected being able to make {} an admin", username));
    }
}

#[tokio::main]
async fn main() {
    let version = env!("CARGO_PKG_VERSION");

    #[cfg(feature = "local_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .pretty()
        .with_file(true)
        .finish();

    #[cfg(feature = "json_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_span_list(true)
        .with_file(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    tracing::info!("Fitdesk backend version: {}", version);
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./localdb.sqlite3".into());
    let pool = Arc::new(
        SqlitePool::connect(&database_url)
            .await
            .expect("Could not connect to database"),
    );

    // Apply SQLite-specific migrations
    sqlx::migrate!("../migrations/sqlite")
        .run(pool.as_ref())
        .await
        .expect("Failed to run migrations");

    let rest_state = RestStateImpl::new(pool.clone());
    create_admin_user(pool.clone(), "DEVUSER").await;
    create_admin_user(pool.clone(), "admin").await;

    rest::start_server(rest_state).await
}
