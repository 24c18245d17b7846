use std::net::Ipv4Addr;

use tracing::info;

use checkoff::{create_app, store::Store, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("CHECKOFF_PORT")
        .expect("CHECKOFF_PORT to be set")
        .parse()
        .expect("port number");

    let db_path = std::env::var("CHECKOFF_DB").unwrap_or_else(|_| "todos.db".to_string());

    let store = Store::open(&db_path).expect("opening todo database");

    let state = AppState { store };
    let app = create_app(state);
    let addr = (Ipv4Addr::UNSPECIFIED, port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to port");

    info!("running on {addr:?}");

    axum::serve(listener, app).await.expect("failed serving");
}
