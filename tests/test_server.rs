use actix_web::{http::StatusCode, App};
use optional_parts::{handlers, test::FormData, Item};

#[actix_rt::test]
async fn round_trip_over_http() {
    let srv = actix_test::start(|| App::new().configure(handlers::configure));

    let (body, headers) = FormData::new().json("item", r#"{"name": "Test"}"#).build();
    let mut req = srv.post("/good");
    *req.headers_mut() = headers;
    let mut res = req.send_body(body).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let item: Item = res.json().await.unwrap();
    assert_eq!(item.name.as_deref(), Some("Test"));

    let (body, headers) = FormData::new().build();
    let mut req = srv.post("/bad");
    *req.headers_mut() = headers;
    let mut res = req.send_body(body).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.body().await.unwrap();
    assert_eq!(body, r#"{"name":null}"#);
}

#[actix_rt::test]
async fn missing_required_part_over_http() {
    let srv = actix_test::start(|| App::new().configure(handlers::configure));

    let (body, headers) = FormData::new()
        .file("file", "some-file.jpg", "jpeg")
        .build();
    let mut req = srv.post("/good");
    *req.headers_mut() = headers;
    let res = req.send_body(body).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
