//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod account_repo;
pub mod analytics_repo;
pub mod bill_repo;
pub mod card_scan_repo;
pub mod client_card_repo;
pub mod company_repo;
pub mod finance_repo;
pub mod order_repo;
pub mod physical_card_repo;
pub mod product_card_repo;
pub mod profile_repo;
pub mod subscription_repo;
pub mod template_repo;
pub mod user_repo;
pub mod user_subscription_repo;

pub use account_repo::AccountRepo;
pub use analytics_repo::AnalyticsRepo;
pub use bill_repo::BillRepo;
pub use card_scan_repo::CardScanRepo;
pub use client_card_repo::ClientCardRepo;
pub use company_repo::CompanyRepo;
pub use finance_repo::FinanceRepo;
pub use order_repo::OrderRepo;
pub use physical_card_repo::PhysicalCardRepo;
pub use product_card_repo::ProductCardRepo;
pub use profile_repo::ProfileRepo;
pub use subscription_repo::SubscriptionRepo;
pub use template_repo::TemplateRepo;
pub use user_repo::UserRepo;
pub use user_subscription_repo::UserSubscriptionRepo;
