pub use sea_orm_migration::prelude::*;

mod m20200216_000001_create_catalog;
mod m20200216_000002_create_players;
mod m20200301_000003_add_player_timestamps;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20200216_000001_create_catalog::Migration),
            Box::new(m20200216_000002_create_players::Migration),
            Box::new(m20200301_000003_add_player_timestamps::Migration),
        ]
    }
}
