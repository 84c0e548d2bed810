// Shared setup for the tests that need a live PostgreSQL.
//
// Point TEST_DATABASE_URL at a scratch database (PostgreSQL 13+). Every test
// gets its own schema, migrated and seeded with two users and one post each.
// Without the variable these tests return early.
#![allow(dead_code)]

use actix_web::middleware::{Logger, from_fn};
use actix_web::{App, web};
use deadpool_postgres::Pool;
use uuid::Uuid;

use blog_api::AppState;
use blog_api::config::{AppConfig, DatabaseSettings, get_pg_pool};
use blog_api::middleware::recover_panic;
use blog_api::repositories::schema;
use blog_api::routes;

pub struct Fixture {
    pub user_id1: Uuid,
    pub user_id2: Uuid,
    pub post_id1: Uuid,
    pub post_id2: Uuid,
}

pub struct TestDb {
    pub pool: Pool,
    pub fixture: Fixture,
    url: String,
    schema: String,
}

pub async fn setup() -> Option<TestDb> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            eprintln!("TEST_DATABASE_URL not set; skipping database test");
            return None;
        }
    };

    let schema_name = format!("test_{}", Uuid::new_v4().simple());
    admin_exec(&url, &format!("CREATE SCHEMA {schema_name}")).await;

    let pool = get_pg_pool(&DatabaseSettings {
        url: Some(url.clone()),
        schema: Some(schema_name.clone()),
        pool_max_size: 4,
        ..Default::default()
    })
    .expect("test pool");
    schema::migrate(&pool).await.expect("migrate test schema");

    let fixture = Fixture {
        user_id1: Uuid::parse_str("4a2b9c10-9daf-11ed-93ce-0242ac120001").unwrap(),
        user_id2: Uuid::parse_str("4a2b9c10-9daf-11ed-93ce-0242ac120002").unwrap(),
        post_id1: Uuid::parse_str("4a2b9c10-9daf-11ed-93ce-0242ac220001").unwrap(),
        post_id2: Uuid::parse_str("4a2b9c10-9daf-11ed-93ce-0242ac220002").unwrap(),
    };

    let client = pool.get().await.expect("checkout");
    // One statement per row so the created_at values differ.
    client
        .execute(
            "INSERT INTO users (id, name, email) VALUES ($1, 'user-1', 'email-1')",
            &[&fixture.user_id1],
        )
        .await
        .unwrap();
    client
        .execute(
            "INSERT INTO users (id, name, email) VALUES ($1, 'user-2', 'email-2')",
            &[&fixture.user_id2],
        )
        .await
        .unwrap();
    client
        .execute(
            "INSERT INTO posts (id, title, content, user_id) VALUES ($1, 'title-1', 'content-1', $2)",
            &[&fixture.post_id1, &fixture.user_id1],
        )
        .await
        .unwrap();
    client
        .execute(
            "INSERT INTO posts (id, title, content, user_id) VALUES ($1, 'title-2', 'content-2', $2)",
            &[&fixture.post_id2, &fixture.user_id2],
        )
        .await
        .unwrap();

    Some(TestDb {
        pool,
        fixture,
        url,
        schema: schema_name,
    })
}

impl TestDb {
    pub async fn count(&self, table: &str) -> i64 {
        let client = self.pool.get().await.unwrap();
        let row = client
            .query_one(&format!("SELECT count(*) FROM {table}"), &[])
            .await
            .unwrap();
        row.get(0)
    }

    pub fn state(&self) -> web::Data<AppState> {
        let mut config = AppConfig::from_lookup(|_| None).unwrap();
        config.database.url = Some(self.url.clone());
        config.database.schema = Some(self.schema.clone());
        web::Data::new(AppState {
            pg_pool: self.pool.clone(),
            config,
        })
    }

    pub async fn teardown(self) {
        self.pool.close();
        admin_exec(&self.url, &format!("DROP SCHEMA {} CASCADE", self.schema)).await;
    }
}

/// The service as `main` assembles it, minus CORS.
pub fn app(
    state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(from_fn(recover_panic))
        .wrap(Logger::default())
        .app_data(state)
        .configure(routes::configure)
}

async fn admin_exec(url: &str, sql: &str) {
    let admin = get_pg_pool(&DatabaseSettings {
        url: Some(url.to_string()),
        pool_max_size: 1,
        ..Default::default()
    })
    .expect("admin pool");
    admin
        .get()
        .await
        .expect("connect to TEST_DATABASE_URL")
        .batch_execute(sql)
        .await
        .expect(sql);
}
