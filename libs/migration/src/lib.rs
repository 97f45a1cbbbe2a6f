pub use sea_orm_migration::prelude::*;

mod m20250601_000000_create_users;
mod m20250601_000001_create_products;
mod m20250601_000002_create_orders;
mod m20250601_000003_seed_initial_data;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000000_create_users::Migration),
            Box::new(m20250601_000001_create_products::Migration),
            Box::new(m20250601_000002_create_orders::Migration),
            Box::new(m20250601_000003_seed_initial_data::Migration),
        ]
    }
}
