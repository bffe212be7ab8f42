use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Status { Table, Active, Inactive, Archived }

#[derive(DeriveIden)]
enum Role { Table, Admin, StoreManager, StoreStaff }

#[derive(DeriveIden)]
enum Stores { Table, Id, Name, Address, Phone, Email, Status, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id, Name, Email, EmailVerified, Image, Role, StoreId, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Products { Table, Id, StoreId, ImageUrl, Name, Description, Status, Price, Stock, AvailableAt, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Orders { Table, Id, StoreId, UserId, TotalAmount, Status, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum OrderItems { Table, Id, OrderId, ProductId, Quantity, Price, CreatedAt }

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Extensions (safe if already present)
        manager.get_connection().execute_unprepared(r#"CREATE EXTENSION IF NOT EXISTS "pgcrypto";"#).await?;

        // Enum types run exactly once under the migration table, so no
        // duplicate_object handling is needed here.
        manager.create_type(
            Type::create()
                .as_enum(Status::Table)
                .values([Status::Active, Status::Inactive, Status::Archived])
                .to_owned()
        ).await?;

        manager.create_type(
            Type::create()
                .as_enum(Role::Table)
                .values([Role::Admin, Role::StoreManager, Role::StoreStaff])
                .to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(Stores::Table)
                .if_not_exists()
                .col(ColumnDef::new(Stores::Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Stores::Name).text().not_null())
                .col(ColumnDef::new(Stores::Address).text().not_null())
                .col(ColumnDef::new(Stores::Phone).text().not_null())
                .col(ColumnDef::new(Stores::Email).text().not_null())
                .col(ColumnDef::new(Stores::Status).custom(Status::Table).not_null().default(Expr::cust("'active'::status")))
                .col(ColumnDef::new(Stores::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .col(ColumnDef::new(Stores::UpdatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(Users::Table)
                .if_not_exists()
                .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key().default(Expr::cust("gen_random_uuid()")))
                .col(ColumnDef::new(Users::Name).text())
                .col(ColumnDef::new(Users::Email).text().not_null())
                .col(ColumnDef::new(Users::EmailVerified).timestamp_with_time_zone())
                .col(ColumnDef::new(Users::Image).text())
                .col(ColumnDef::new(Users::Role).custom(Role::Table).not_null().default(Expr::cust("'store_staff'::role")))
                .col(ColumnDef::new(Users::StoreId).integer())
                .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .foreign_key(ForeignKey::create()
                    .name("fk_users_store")
                    .from(Users::Table, Users::StoreId)
                    .to(Stores::Table, Stores::Id)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_users_email").table(Users::Table).col(Users::Email).unique().to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(Products::Table)
                .if_not_exists()
                .col(ColumnDef::new(Products::Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Products::StoreId).integer().not_null())
                .col(ColumnDef::new(Products::ImageUrl).text().not_null())
                .col(ColumnDef::new(Products::Name).text().not_null())
                .col(ColumnDef::new(Products::Description).text())
                .col(ColumnDef::new(Products::Status).custom(Status::Table).not_null())
                .col(ColumnDef::new(Products::Price).decimal_len(10, 2).not_null())
                .col(ColumnDef::new(Products::Stock).integer().not_null())
                .col(ColumnDef::new(Products::AvailableAt).timestamp_with_time_zone().not_null())
                .col(ColumnDef::new(Products::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .col(ColumnDef::new(Products::UpdatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .foreign_key(ForeignKey::create()
                    .name("fk_products_store")
                    .from(Products::Table, Products::StoreId)
                    .to(Stores::Table, Stores::Id)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_products_store").table(Products::Table).col(Products::StoreId).to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_products_name").table(Products::Table).col(Products::Name).to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(Orders::Table)
                .if_not_exists()
                .col(ColumnDef::new(Orders::Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Orders::StoreId).integer().not_null())
                .col(ColumnDef::new(Orders::UserId).uuid())
                .col(ColumnDef::new(Orders::TotalAmount).decimal_len(10, 2).not_null())
                .col(ColumnDef::new(Orders::Status).custom(Status::Table).not_null())
                .col(ColumnDef::new(Orders::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .col(ColumnDef::new(Orders::UpdatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .foreign_key(ForeignKey::create()
                    .name("fk_orders_store")
                    .from(Orders::Table, Orders::StoreId)
                    .to(Stores::Table, Stores::Id)
                )
                .foreign_key(ForeignKey::create()
                    .name("fk_orders_user")
                    .from(Orders::Table, Orders::UserId)
                    .to(Users::Table, Users::Id)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_orders_store").table(Orders::Table).col(Orders::StoreId).to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(OrderItems::Table)
                .if_not_exists()
                .col(ColumnDef::new(OrderItems::Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(OrderItems::OrderId).integer())
                .col(ColumnDef::new(OrderItems::ProductId).integer())
                .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                .col(ColumnDef::new(OrderItems::Price).decimal_len(10, 2).not_null())
                .col(ColumnDef::new(OrderItems::CreatedAt).timestamp_with_time_zone().not_null().default(Expr::cust("now()")))
                .foreign_key(ForeignKey::create()
                    .name("fk_order_items_order")
                    .from(OrderItems::Table, OrderItems::OrderId)
                    .to(Orders::Table, Orders::Id)
                )
                .foreign_key(ForeignKey::create()
                    .name("fk_order_items_product")
                    .from(OrderItems::Table, OrderItems::ProductId)
                    .to(Products::Table, Products::Id)
                )
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(OrderItems::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Orders::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Products::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Stores::Table).to_owned()).await?;
        manager.drop_type(Type::drop().name(Role::Table).to_owned()).await?;
        manager.drop_type(Type::drop().name(Status::Table).to_owned()).await?;
        Ok(())
    }
}
