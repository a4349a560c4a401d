use std::net::SocketAddr;
use std::path::PathBuf;

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use server::startup::build_app;

struct TestApp {
    base_url: String,
    data_dir: PathBuf,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Use isolated temp data dir per test run
    let data_dir = std::env::temp_dir().join(format!("repairshop_e2e_{}", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.storage.data_dir = data_dir.to_string_lossy().into_owned();

    let app = build_app(&cfg);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, data_dir })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_every_entity_has_a_default() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    for kind in models::EntityKind::ALL {
        let res = c.get(format!("{}/api/data/{}", app.base_url, kind.name())).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK, "{kind}");
        let body = res.json::<Value>().await?;
        assert_eq!(body.is_object(), kind.is_singleton(), "{kind}");
        assert!(tokio::fs::metadata(app.data_dir.join(kind.file_name())).await.is_ok());
    }
    let _ = tokio::fs::remove_dir_all(&app.data_dir).await;
    Ok(())
}

#[tokio::test]
async fn e2e_concurrent_posts_leave_one_whole_payload() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let payload = |tag: &str, n: usize| -> Value {
        Value::Array(
            (0..n)
                .map(|i| json!({"id": format!("{tag}-{i}"), "kind": "income", "description": tag.repeat(32), "amount": i}))
                .collect(),
        )
    };
    let a = payload("a", 400);
    let b = payload("b", 600);

    let url = format!("{}/api/data/financialTransactions", app.base_url);
    let mut handles = Vec::new();
    for round in 0..10 {
        let body = if round % 2 == 0 { a.clone() } else { b.clone() };
        let (c, url) = (c.clone(), url.clone());
        handles.push(tokio::spawn(async move { c.post(url).json(&body).send().await }));
    }
    for h in handles {
        assert_eq!(h.await??.status(), HttpStatusCode::OK);
    }

    let stored = c.get(&url).send().await?.json::<Value>().await?;
    assert!(stored == a || stored == b, "interleaved document");

    let _ = tokio::fs::remove_dir_all(&app.data_dir).await;
    Ok(())
}
