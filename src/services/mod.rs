//! Persistence services. One service struct per entity, each holding a shared
//! connection pool and exposing the queries the handlers need.

pub mod clients;
pub mod credit_reports;
pub mod documents;
pub mod users;

pub use clients::ClientService;
pub use credit_reports::CreditReportService;
pub use documents::DocumentService;
pub use users::UserService;
