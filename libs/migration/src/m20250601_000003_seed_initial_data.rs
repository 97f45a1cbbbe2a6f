use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Explicit startup-time registration of the initial accounts and demo
// catalog. The seed accounts are for development environments; rotate the
// credentials before exposing an instance.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Seed users: one admin (staff) account, one regular account
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO users (id, email, name, password_hash, roles, created_at, updated_at)
            VALUES
                (
                    '01970b3c-1a5f-7000-8000-000000000001',
                    'admin@storefront.dev',
                    'Store Admin',
                    '$argon2id$v=19$m=19456,t=2,p=1$VE0rHYzGbYjDhGgvhdzFPw$CJpleaNYKGFpc44EFOyWTE+fG2Z0A+6Ka2SlQQzroYA',
                    '["admin"]'::JSONB,
                    NOW(),
                    NOW()
                ),
                (
                    '01970b3c-1a5f-7001-8000-000000000002',
                    'customer@storefront.dev',
                    'Demo Customer',
                    '$argon2id$v=19$m=19456,t=2,p=1$VE0rHYzGbYjDhGgvhdzFPw$CJpleaNYKGFpc44EFOyWTE+fG2Z0A+6Ka2SlQQzroYA',
                    '["user"]'::JSONB,
                    NOW(),
                    NOW()
                )
            ON CONFLICT (id) DO NOTHING
            "#,
            )
            .await?;

        // Seed demo catalog
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO products (id, name, description, price, stock, created_at, updated_at)
            VALUES
                (
                    '01970b3c-1a5f-7002-8000-000000000003',
                    'Mechanical Keyboard',
                    'Tenkeyless mechanical keyboard with hot-swappable switches',
                    '129.99',
                    42,
                    NOW(),
                    NOW()
                ),
                (
                    '01970b3c-1a5f-7003-8000-000000000004',
                    'USB-C Dock',
                    'Dual-display dock with 100W passthrough charging',
                    '89.50',
                    17,
                    NOW(),
                    NOW()
                ),
                (
                    '01970b3c-1a5f-7004-8000-000000000005',
                    'Laptop Stand',
                    'Adjustable aluminium laptop stand',
                    '35.00',
                    64,
                    NOW(),
                    NOW()
                )
            ON CONFLICT (id) DO NOTHING
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            DELETE FROM products WHERE id IN (
                '01970b3c-1a5f-7002-8000-000000000003',
                '01970b3c-1a5f-7003-8000-000000000004',
                '01970b3c-1a5f-7004-8000-000000000005'
            );
            DELETE FROM users WHERE id IN (
                '01970b3c-1a5f-7000-8000-000000000001',
                '01970b3c-1a5f-7001-8000-000000000002'
            );
            "#,
            )
            .await?;

        Ok(())
    }
}
