mod common;

use collection_tracking::services::{JwtConfig, JwtService};
use collection_tracking::utils::errors::AppError;

use common::{spawn_app, test_config};

#[tokio::test]
async fn test_handshake_with_minted_token() {
    let app = spawn_app().await;
    let jwt = JwtService::new(JwtConfig::from(&test_config()));
    let token = jwt.generate_access_token(app.hauler.user_id).unwrap();

    let identity = app.state.sessions.authenticate(Some(&token)).await.unwrap();
    assert_eq!(identity, app.hauler);
}

#[tokio::test]
async fn test_handshake_rejects_foreign_secret() {
    let app = spawn_app().await;
    let mut config = test_config();
    config.jwt_secret = "another-secret".to_string();
    let token = JwtService::new(JwtConfig::from(&config))
        .generate_access_token(app.hauler.user_id)
        .unwrap();

    let err = app.state.sessions.authenticate(Some(&token)).await.unwrap_err();
    assert!(matches!(err, AppError::AuthenticationFailed));
}

#[tokio::test]
async fn test_personal_topic_lives_with_the_connection() {
    let app = spawn_app().await;
    let client = app.connect(&app.hauler).await;
    assert_eq!(app.state.registry.connection_count().await, 1);

    app.state.sessions.close_session(&client.conn).await;
    assert_eq!(app.state.registry.connection_count().await, 0);
}
