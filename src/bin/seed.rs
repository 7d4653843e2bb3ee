//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env). Provisions the admin account and a
//! spread of sample visits and responses so a fresh environment renders a
//! populated dashboard.

use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;

const ADMIN_EMAIL: &str = "admin@pulseboard.local";
const ADMIN_PASSWORD: &str = "Test123!";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== Pulseboard Seed Script ===");

    seed_admin_user(&pool).await?;
    seed_access_log(&pool).await?;
    seed_responses(&pool).await?;

    println!("\n=== Seed complete! ===");
    println!("Admin login: {ADMIN_EMAIL} / {ADMIN_PASSWORD}");

    Ok(())
}

async fn seed_admin_user(pool: &PgPool) -> anyhow::Result<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(ADMIN_EMAIL)
        .fetch_one(pool)
        .await?;

    let hash = pulseboard::services::auth::hash_password(ADMIN_PASSWORD)?;

    if exists {
        // Update password for existing admin user
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE email = $2")
            .bind(&hash)
            .bind(ADMIN_EMAIL)
            .execute(pool)
            .await?;
        println!("[done] Updated admin password");
        return Ok(());
    }

    sqlx::query(
        "INSERT INTO users (email, password_hash, display_name)
         VALUES ($1, $2, 'Dashboard Admin')",
    )
    .bind(ADMIN_EMAIL)
    .bind(&hash)
    .execute(pool)
    .await?;

    println!("[done] Created admin user");
    Ok(())
}

async fn seed_access_log(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM access_log")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Access log already populated ({count})");
        return Ok(());
    }

    // One hash per synthetic visitor, the way the collection app dedups.
    let now = Utc::now();
    for i in 0..40 {
        let hash = hex::encode(Sha256::digest(format!("seed-visitor-{i}")));
        sqlx::query("INSERT INTO access_log (visitor_hash, occurred_at) VALUES ($1, $2)")
            .bind(&hash)
            .bind(now - Duration::hours(i * 5))
            .execute(pool)
            .await?;
    }

    println!("[done] Created 40 sample visits");
    Ok(())
}

async fn seed_responses(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM responses")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Responses already exist ({count})");
        return Ok(());
    }

    // Spread across the score bands, several days, and the common channels
    // so every chart on the dashboard has something to show.
    let samples: Vec<(i64, i32, [i32; 5], Option<&str>, Option<&str>)> = vec![
        (0, 10, [5, 5, 4, 5, 5], Some("Maria Silva"), Some("whatsapp")),
        (0, 9, [4, 5, 4, 4, 5], None, Some("qr_code")),
        (0, 7, [4, 3, 3, 4, 3], Some("João Santos"), Some("email")),
        (1, 8, [4, 4, 5, 3, 4], None, Some("whatsapp")),
        (1, 6, [3, 3, 2, 4, 3], None, None),
        (1, 10, [5, 5, 5, 5, 5], Some("Ana Costa"), Some("qr_code")),
        (2, 3, [2, 1, 2, 3, 2], None, Some("email")),
        (2, 9, [5, 4, 4, 5, 4], None, Some("whatsapp")),
        (3, 5, [3, 2, 3, 3, 3], Some("Pedro Lima"), None),
        (3, 8, [4, 4, 4, 4, 5], None, Some("qr_code")),
        (4, 1, [1, 1, 2, 1, 2], None, Some("email")),
        (4, 10, [5, 5, 5, 4, 5], None, Some("whatsapp")),
    ];

    let now = Utc::now();
    for (days_ago, nps, qs, name, source) in samples {
        sqlx::query(
            "INSERT INTO responses
                 (created_at, nps_score, q1, q2, q3, q4, q5, duration_ms, name, phone, source)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(now - Duration::days(days_ago))
        .bind(nps)
        .bind(qs[0])
        .bind(qs[1])
        .bind(qs[2])
        .bind(qs[3])
        .bind(qs[4])
        .bind(30_000i64 + days_ago * 7_000)
        .bind(name)
        .bind(name.map(|_| "+55 11 99999-0000"))
        .bind(source)
        .execute(pool)
        .await?;
    }

    println!("[done] Created 12 sample responses");
    Ok(())
}
