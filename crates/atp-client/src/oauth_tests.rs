    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    use atp_protocols::error::TransportError;
    use atp_protocols::oauth::ConnectionStatus;

    /// Backend that replays scripted status reports, repeating the last one.
    struct ScriptedBackend {
        script: Mutex<Vec<Result<ConnectionStatus, AtpError>>>,
        polls: AtomicU32,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Result<ConnectionStatus, AtpError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script),
                polls: AtomicU32::new(0),
            })
        }

        fn polls(&self) -> u32 {
            self.polls.load(Ordering::SeqCst)
        }
    }

    fn status(status: SessionStatus, info: Option<Value>) -> Result<ConnectionStatus, AtpError> {
        Ok(ConnectionStatus {
            status,
            connection_info: info,
        })
    }

    #[async_trait]
    impl OAuthBackend for ScriptedBackend {
        async fn initiate(
            &self,
            platform_id: &str,
            _external_user_id: &str,
        ) -> Result<AuthorizationUrl, AtpError> {
            if platform_id == "unknown" {
                return Err(AuthError::PlatformNotFound(platform_id.to_string()).into());
            }
            Ok(AuthorizationUrl {
                auth_url: format!("https://auth.example.com/{platform_id}"),
            })
        }

        async fn status(&self, _: &str, _: &str) -> Result<ConnectionStatus, AtpError> {
            self.polls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock();
            if script.len() > 1 {
                script.remove(0)
            } else {
                match script.first() {
                    Some(Ok(report)) => Ok(report.clone()),
                    _ => Err(TransportError::Network("no script".into()).into()),
                }
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_authorized_times_out_after_60_polls() {
        let backend = ScriptedBackend::new(vec![status(SessionStatus::Pending, None)]);
        let connector = OAuthConnector::new(backend.clone());
        connector.initiate("github", "u-1").await.unwrap();

        let started = Instant::now();
        let err = connector
            .wait_for_connection(
                "github",
                "u-1",
                Duration::from_secs(5),
                Duration::from_secs(300),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AtpError::Auth(AuthError::OAuthTimeout {
                waited_secs: 300,
                polls: 60
            })
        ));
        assert_eq!(backend.polls(), 60);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(300) && waited < Duration::from_secs(301));
        assert_eq!(
            connector.session("github", "u-1").unwrap().status,
            SessionStatus::Pending
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_authorized_returns_connection_info() {
        let backend = ScriptedBackend::new(vec![
            status(SessionStatus::Pending, None),
            Err(TransportError::Network("reset".into()).into()),
            status(
                SessionStatus::Authorized,
                Some(json!({ "access_token": "gh-tok", "scopes": ["repo"] })),
            ),
        ]);
        let connector = OAuthConnector::new(backend.clone());
        let url = connector.initiate("github", "u-1").await.unwrap();
        assert_eq!(url.auth_url, "https://auth.example.com/github");
        assert!(connector.credential("github", "u-1").is_err());

        let info = connector
            .wait_for_connection(
                "github",
                "u-1",
                Duration::from_secs(5),
                Duration::from_secs(300),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(info["access_token"], "gh-tok");
        assert_eq!(backend.polls(), 3);
        let session = connector.session("github", "u-1").unwrap();
        assert_eq!(session.status, SessionStatus::Authorized);
        assert!(session.established_at.is_some());
        assert_eq!(connector.credential("github", "u-1").unwrap(), "gh-tok");
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_fails() {
        let backend = ScriptedBackend::new(vec![
            status(SessionStatus::Pending, None),
            status(SessionStatus::Expired, None),
        ]);
        let connector = OAuthConnector::new(backend);

        let err = connector
            .wait_for_connection(
                "github",
                "u-1",
                Duration::from_secs(1),
                Duration::from_secs(60),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AtpError::Auth(AuthError::OAuthFailed(SessionStatus::Expired))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_polling() {
        let backend = ScriptedBackend::new(vec![status(SessionStatus::Pending, None)]);
        let connector = Arc::new(OAuthConnector::new(backend.clone()));
        connector.initiate("github", "u-1").await.unwrap();
        let cancel = CancellationToken::new();

        let waiter = {
            let connector = connector.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                connector
                    .wait_for_connection(
                        "github",
                        "u-1",
                        Duration::from_secs(5),
                        Duration::from_secs(300),
                        &cancel,
                    )
                    .await
            })
        };

        tokio::time::sleep(Duration::from_secs(12)).await;
        cancel.cancel();
        let err = waiter.await.unwrap().unwrap_err();
        assert!(matches!(err, AtpError::Auth(AuthError::Cancelled)));

        let polls = backend.polls();
        assert_eq!(polls, 2);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(backend.polls(), polls);
        assert_eq!(
            connector.session("github", "u-1").unwrap().status,
            SessionStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_unknown_platform() {
        let connector = OAuthConnector::new(ScriptedBackend::new(vec![]));
        let err = connector.initiate("unknown", "u-1").await.unwrap_err();
        assert!(matches!(err, AtpError::Auth(AuthError::PlatformNotFound(_))));
        assert!(connector.session("unknown", "u-1").is_none());
    }

    #[test]
    fn test_credential_requires_session() {
        let connector = OAuthConnector::new(ScriptedBackend::new(vec![]));
        let err = connector.credential("github", "u-2").unwrap_err();
        assert_eq!(
            err,
            AuthError::AuthNotEstablished {
                platform_id: "github".into(),
                external_user_id: "u-2".into()
            }
        );
    }

    #[tokio::test]
    async fn test_refresh_picks_up_existing_connection() {
        let backend = ScriptedBackend::new(vec![status(
            SessionStatus::Authorized,
            Some(json!({ "connection_id": "conn-9" })),
        )]);
        let connector = OAuthConnector::new(backend.clone());

        let session = connector.refresh("slack", "u-3").await.unwrap();
        assert_eq!(session.status, SessionStatus::Authorized);
        assert!(session.auth_url.is_none());
        assert_eq!(connector.credential("slack", "u-3").unwrap(), "conn-9");
        assert_eq!(backend.polls(), 1);
    }
