//! Notehub server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, ServiceExt, extract::Request};
use notehub_api::{AppState, router as api_router};
use notehub_common::{Config, LocalStorage, StorageBackend};
use notehub_core::{
    CommentService, FeedbackService, MediaService, NoteService, RatingService, SemesterService,
    StatsService, SubjectService,
};
use notehub_db::repositories::{
    CommentRepository, FeedbackRepository, NoteRepository, RatingRepository, SemesterRepository,
    SubjectRepository,
};
use tokio::signal;
use tower::Layer;
use tower_http::{
    cors::{Any, CorsLayer},
    normalize_path::NormalizePathLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notehub=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting notehub server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = notehub_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    notehub_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let semester_repo = SemesterRepository::new(Arc::clone(&db));
    let subject_repo = SubjectRepository::new(Arc::clone(&db));
    let note_repo = NoteRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let rating_repo = RatingRepository::new(Arc::clone(&db));
    let feedback_repo = FeedbackRepository::new(Arc::clone(&db));

    // File storage under the configured media root
    let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(
        config.media.root.clone(),
        config.media.base_url.clone(),
    ));

    // Initialize services
    let note_service = NoteService::new(
        note_repo.clone(),
        subject_repo.clone(),
        semester_repo.clone(),
        comment_repo.clone(),
        rating_repo.clone(),
        storage.clone(),
    );
    let subject_service = SubjectService::new(
        subject_repo.clone(),
        semester_repo.clone(),
        note_repo.clone(),
        rating_repo.clone(),
        note_service.clone(),
    );
    let semester_service = SemesterService::new(
        semester_repo.clone(),
        subject_repo.clone(),
        note_repo.clone(),
        subject_service.clone(),
    );
    let comment_service = CommentService::new(comment_repo.clone(), note_repo.clone());
    let rating_service = RatingService::new(rating_repo.clone(), note_repo.clone());
    let feedback_service = FeedbackService::new(feedback_repo);
    let stats_service = StatsService::new(
        semester_repo,
        subject_repo,
        note_repo.clone(),
        comment_repo,
        rating_repo,
    );
    let media_service = MediaService::new(note_repo, storage);

    let state = AppState {
        semester_service,
        subject_service,
        note_service,
        comment_service,
        rating_service,
        feedback_service,
        stats_service,
        media_service,
    };

    // Open reads and open writes by design; CORS stays permissive
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .nest("/api", api_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // The catalog's historical URLs carry trailing slashes
    let app = NormalizePathLayer::trim_trailing_slash().layer(router);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
