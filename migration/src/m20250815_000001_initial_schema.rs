use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Enable foreign keys for SQLite
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Sqlite {
            manager
                .get_connection()
                .execute_unprepared("PRAGMA foreign_keys = ON")
                .await?;
        }

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string(Users::Name))
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(string(Users::PasswordHash))
                    .col(string_null(Users::EmployeeId))
                    .col(string_null(Users::Role))
                    .col(big_integer(Users::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create shifts table
        manager
            .create_table(
                Table::create()
                    .table(Shifts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shifts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string(Shifts::UserId))
                    .col(big_integer(Shifts::StartTime))
                    .col(big_integer(Shifts::EndTime))
                    .col(
                        ColumnDef::new(Shifts::Acknowledged)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(string_null(Shifts::Notes))
                    .col(big_integer(Shifts::CreatedAt))
                    .col(big_integer(Shifts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shifts_user")
                            .from(Shifts::Table, Shifts::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index backing the per-owner overlap query
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_shifts_owner_interval")
                    .table(Shifts::Table)
                    .col(Shifts::UserId)
                    .col(Shifts::StartTime)
                    .col(Shifts::EndTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Shifts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    EmployeeId,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Shifts {
    Table,
    Id,
    UserId,
    StartTime,
    EndTime,
    Acknowledged,
    Notes,
    CreatedAt,
    UpdatedAt,
}
