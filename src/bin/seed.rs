use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use uuid::Uuid;

use axum_logistics_api::{config::AppConfig, db::create_pool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "Main Admin", "admin@example.com", "admin123", "MAIN_ADMIN").await?;
    let owner_id = ensure_user(&pool, "Owner", "owner@example.com", "owner123", "OWNER").await?;
    seed_shipping_rates(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, Owner ID: {owner_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

async fn seed_shipping_rates(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM shipping_rates")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(());
    }

    // (courier, service, origin, destination, max weight, cost, etd)
    let rates: [(&str, &str, &str, &str, f64, i64, &str); 8] = [
        ("JNE", "REG", "Jakarta", "Bandung", 1.0, 12_000, "2-3"),
        ("JNE", "YES", "Jakarta", "Bandung", 1.0, 18_000, "1"),
        ("JNE", "REG", "Jakarta", "Surabaya", 1.0, 18_000, "2-3"),
        ("TIKI", "REG", "Jakarta", "Bandung", 1.0, 11_000, "3-4"),
        ("TIKI", "REG", "Jakarta", "Surabaya", 1.0, 17_000, "3-4"),
        ("SICEPAT", "BEST", "Jakarta", "Bandung", 1.0, 15_000, "1-2"),
        ("SICEPAT", "REG", "Jakarta", "Surabaya", 1.0, 16_000, "2-3"),
        ("ANTERAJA", "REG", "Jakarta", "Bandung", 1.0, 10_000, "3-5"),
    ];

    for (courier, service, origin, destination, weight, cost, etd) in rates {
        sqlx::query(
            r#"
            INSERT INTO shipping_rates (id, courier, service, origin, destination, weight, cost, etd)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(courier)
        .bind(service)
        .bind(origin)
        .bind(destination)
        .bind(weight)
        .bind(cost)
        .bind(etd)
        .execute(pool)
        .await?;
    }

    println!("Seeded {} shipping rates", rates.len());
    Ok(())
}
