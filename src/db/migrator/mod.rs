use sea_orm_migration::prelude::*;

mod m20250505_initial;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250505_initial::Migration)]
    }
}
