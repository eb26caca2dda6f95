//! Repository layer: one struct per table, static async methods over `PgPool`.

pub mod visitor_repo;

pub use visitor_repo::VisitorRepo;
