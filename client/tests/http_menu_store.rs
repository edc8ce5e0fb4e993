//! HTTP menu store tests against an in-process actix-web backend.
//!
//! The fake backend keeps one JSON document and serves it at `/menu` with
//! whole-document `GET` and `PUT`, optionally misbehaving on request.

use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpResponse, HttpServer, web};
use menu_admin::domain::ports::{MenuStore, MenuStoreError};
use menu_admin::domain::{Category, Ingredient, MenuAdmin, MenuAggregate, SyncPolicy};
use menu_admin::outbound::http::HttpMenuStore;
use rstest::rstest;
use serde_json::{Value, json};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Behaviour {
    Healthy,
    ServerError,
    MalformedBody,
}

struct Backend {
    document: Mutex<Value>,
    behaviour: Behaviour,
}

async fn get_menu(backend: web::Data<Backend>) -> HttpResponse {
    match backend.behaviour {
        Behaviour::Healthy => {
            let document = backend.document.lock().expect("document lock").clone();
            HttpResponse::Ok().json(document)
        }
        Behaviour::ServerError => HttpResponse::InternalServerError().body("database offline"),
        Behaviour::MalformedBody => HttpResponse::Ok()
            .content_type("application/json")
            .body("{\"ingredients\": [oops"),
    }
}

async fn put_menu(backend: web::Data<Backend>, body: web::Json<Value>) -> HttpResponse {
    if backend.behaviour == Behaviour::ServerError {
        return HttpResponse::InternalServerError().finish();
    }
    *backend.document.lock().expect("document lock") = body.into_inner();
    HttpResponse::NoContent().finish()
}

async fn spawn_backend(
    document: Value,
    behaviour: Behaviour,
) -> (HttpMenuStore, web::Data<Backend>, ServerHandle) {
    let backend = web::Data::new(Backend {
        document: Mutex::new(document),
        behaviour,
    });
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind backend");
    let addr = listener.local_addr().expect("backend address");

    let app_backend = backend.clone();
    let server = HttpServer::new(move || {
        App::new().app_data(app_backend.clone()).service(
            web::resource("/menu")
                .route(web::get().to(get_menu))
                .route(web::put().to(put_menu)),
        )
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .expect("listen")
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    let endpoint = format!("http://{addr}/menu").parse().expect("endpoint URL");
    let store = HttpMenuStore::new(endpoint).expect("build store");
    (store, backend, handle)
}

fn seeded_document() -> Value {
    json!({
        "ingredients": [{"id": 1, "name": "Salt", "unit": "g", "quantity": 5}],
        "categories": [{"id": 1, "name": "Starters"}],
        "theme": "dark"
    })
}

#[actix_web::test]
async fn mutation_round_trips_through_the_backend() {
    let (store, backend, handle) = spawn_backend(seeded_document(), Behaviour::Healthy).await;
    let admin = MenuAdmin::new(Arc::new(store), SyncPolicy::default());

    admin.authenticate().await.expect("initial load");
    admin
        .menu()
        .expect("authenticated")
        .add_category(Category::new(2, "Mains"))
        .await
        .expect("add category");

    let stored = backend.document.lock().expect("document lock").clone();
    assert_eq!(stored["theme"], json!("dark"), "unknown fields survive");
    assert_eq!(stored["ingredients"][0]["quantity"], json!(5));
    assert_eq!(stored["categories"][1]["name"], json!("Mains"));
    assert_eq!(
        admin.snapshot().categories,
        vec![Category::new(1, "Starters"), Category::new(2, "Mains")]
    );

    handle.stop(true).await;
}

#[actix_web::test]
async fn replace_sends_the_whole_document() {
    let (store, backend, handle) = spawn_backend(json!({}), Behaviour::Healthy).await;
    let menu = MenuAggregate::new(vec![Ingredient::new("pepper", "Pepper")], Vec::new());

    store.replace_menu(&menu).await.expect("write");
    let fetched = store.fetch_menu().await.expect("read back");

    assert_eq!(fetched, menu);
    let stored = backend.document.lock().expect("document lock").clone();
    assert_eq!(
        stored,
        json!({"ingredients": [{"id": "pepper", "name": "Pepper"}], "categories": []})
    );

    handle.stop(true).await;
}

#[rstest]
#[case::server_error(Behaviour::ServerError)]
#[case::malformed_body(Behaviour::MalformedBody)]
#[actix_web::test]
async fn failed_reads_are_classified(#[case] behaviour: Behaviour) {
    let (store, _backend, handle) = spawn_backend(seeded_document(), behaviour).await;

    let error = store.fetch_menu().await.expect_err("read should fail");
    match behaviour {
        Behaviour::ServerError => {
            assert!(error.is_transport());
            assert!(error.to_string().contains("status 500: database offline"));
        }
        Behaviour::MalformedBody => {
            assert!(matches!(error, MenuStoreError::Decode { .. }), "got {error:?}");
        }
        Behaviour::Healthy => unreachable!("healthy backend is not a failure case"),
    }

    handle.stop(true).await;
}

#[actix_web::test]
async fn failed_initial_load_leaves_the_snapshot_empty() {
    let (store, _backend, handle) = spawn_backend(seeded_document(), Behaviour::ServerError).await;
    let admin = MenuAdmin::new(Arc::new(store), SyncPolicy::default());

    let error = admin.authenticate().await.expect_err("load fails");
    assert!(error.is_transport());
    assert!(admin.snapshot().ingredients.is_empty());

    handle.stop(true).await;
}

#[actix_web::test]
async fn refused_connection_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("ephemeral address");
    drop(listener);

    let endpoint = format!("http://{addr}/menu").parse().expect("endpoint URL");
    let store = HttpMenuStore::new(endpoint).expect("build store");

    let error = store.fetch_menu().await.expect_err("nothing listens");
    assert!(error.is_transport());
}
