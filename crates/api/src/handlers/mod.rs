pub mod asset_categories;
pub mod assets;
pub mod borrow_records;
pub mod health;
pub mod maintenance_records;
