use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vocab_review::{config::Config, db, db::LogOnError, state::AppState};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vocab_review=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::load();
  let pool = db::init_db(&config.database_path).expect("Failed to initialize database");

  {
    let conn = pool.lock().expect("Database lock failed during startup");
    let count = db::get_word_count(&conn).log_warn_default("Failed to count words");
    tracing::info!("Loaded {} words", count);
  }

  let bind_addr = config.server_bind_addr();
  let port = config.server_port;
  let app = vocab_review::app(AppState::new(pool, config));

  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
