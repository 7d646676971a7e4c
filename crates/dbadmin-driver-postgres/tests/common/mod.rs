//! Live PostgreSQL server for driver tests.
//!
//! A `postgres:16-alpine` container is started on first use and shared by
//! every test in the process. Set `DBADMIN_TEST_DATABASE_URL` to run against
//! an existing server instead. When no server can be started the tests log
//! a warning and return early; a server that rejects the fixtures fails them.

#![allow(dead_code)]

use std::sync::Mutex;

use dbadmin_core::Connection;
use dbadmin_driver_postgres::{PostgresConnection, TlsSettings};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Schema the fixture tables and routines live in
pub const SCHEMA: &str = "dbadmin_live";

/// Fixture objects. `public.live_orders` deliberately shares its name with a
/// table of the administered schema.
const FIXTURE_SQL: &str = r#"
DROP SCHEMA IF EXISTS dbadmin_live CASCADE;
CREATE SCHEMA dbadmin_live;

DROP TABLE IF EXISTS public.live_orders;
CREATE TABLE public.live_orders (id integer PRIMARY KEY, note text);
INSERT INTO public.live_orders VALUES (99, 'public-row');

CREATE TABLE dbadmin_live.live_orders (order_id integer PRIMARY KEY, note text);
INSERT INTO dbadmin_live.live_orders VALUES (10, 'schema-row');

CREATE TABLE dbadmin_live.Students (id integer PRIMARY KEY, name text);
INSERT INTO dbadmin_live.Students VALUES (1, 'Ann'), (2, 'Bob');

CREATE TABLE dbadmin_live.peers (nickname text PRIMARY KEY, email text);
INSERT INTO dbadmin_live.peers VALUES ('ann', 'ann@school.io'), ('bob', NULL);

CREATE PROCEDURE dbadmin_live.prc_noop()
LANGUAGE plpgsql AS $$ BEGIN NULL; END $$;

CREATE PROCEDURE dbadmin_live.prc_peer_cursor(IN cur refcursor)
LANGUAGE plpgsql AS $$
BEGIN
    OPEN cur FOR SELECT nickname, email FROM dbadmin_live.peers ORDER BY nickname;
END $$;
"#;

struct LiveServer {
    url: String,
    #[allow(dead_code)]
    container: Option<Mutex<ContainerAsync<Postgres>>>,
}

static LIVE_SERVER: OnceCell<Option<LiveServer>> = OnceCell::const_new();

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("dbadmin_driver_postgres=debug")
        .with_test_writer()
        .try_init();
}

async fn start_server() -> anyhow::Result<LiveServer> {
    if let Ok(url) = std::env::var("DBADMIN_TEST_DATABASE_URL") {
        return Ok(LiveServer { url, container: None });
    }

    tracing::info!("starting PostgreSQL test container");
    let container = Postgres::default().with_tag("16-alpine").start().await?;
    let port = container.get_host_port_ipv4(5432).await?;

    Ok(LiveServer {
        url: format!("host=127.0.0.1 port={port} user=postgres password=postgres dbname=postgres"),
        container: Some(Mutex::new(container)),
    })
}

async fn seed(url: &str) -> anyhow::Result<()> {
    let connection = PostgresConnection::from_connection_string(url, &TlsSettings::disabled(), "public")?;
    connection.query(FIXTURE_SQL).await?;
    Ok(())
}

/// Connection string of the seeded server, or `None` when no server is available
pub async fn live_url() -> Option<String> {
    init_test_logging();

    let server = LIVE_SERVER
        .get_or_init(|| async {
            let server = match start_server().await {
                Ok(server) => server,
                Err(e) => {
                    tracing::warn!(error = %e, "no PostgreSQL server available, skipping live tests");
                    return None;
                }
            };
            if let Err(e) = seed(&server.url).await {
                panic!("failed to load fixtures: {e}");
            }
            Some(server)
        })
        .await;

    server.as_ref().map(|server| server.url.clone())
}

/// A connection administering [`SCHEMA`] on the live server
pub async fn live_connection() -> Option<PostgresConnection> {
    let url = live_url().await?;
    Some(
        PostgresConnection::from_connection_string(&url, &TlsSettings::disabled(), SCHEMA)
            .expect("fixture connection string parses"),
    )
}
