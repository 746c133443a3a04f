//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod asset_category_repo;
pub mod asset_repo;
pub mod borrow_record_repo;
pub mod maintenance_record_repo;

pub use asset_category_repo::AssetCategoryRepo;
pub use asset_repo::AssetRepo;
pub use borrow_record_repo::BorrowRecordRepo;
pub use maintenance_record_repo::MaintenanceRecordRepo;
