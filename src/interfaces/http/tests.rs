//! End-to-end page flows against an in-memory database

use std::str::FromStr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use super::{create_router, AppState, CookieSettings};
use crate::infrastructure::database::seed::fixtures;
use crate::infrastructure::database::test_database;
use crate::infrastructure::InMemorySessionStore;

struct TestApp {
    router: Router,
    db: DatabaseConnection,
    location: i32,
    car: i32,
    insurance: i32,
    gps: i32,
    seat: i32,
}

impl TestApp {
    async fn new() -> Self {
        let db = test_database().await;
        let location = fixtures::location(&db, "Berlin", "Mitte").await;
        let car = fixtures::car(&db, location, "Golf", Decimal::new(5000, 2)).await;
        let insurance = fixtures::insurance(&db, "Full cover", Decimal::new(1000, 2)).await;
        let gps = fixtures::accessory(&db, "GPS", Decimal::new(500, 2)).await;
        let seat = fixtures::accessory(&db, "Child seat", Decimal::new(700, 2)).await;

        let state = AppState::new(
            db.clone(),
            Arc::new(InMemorySessionStore::new()),
            CookieSettings::default(),
            crate::infrastructure::crypto::MIN_COST,
        );

        Self {
            router: create_router(state, None),
            db,
            location,
            car,
            insurance,
            gps,
            seat,
        }
    }

    async fn send(&self, req: Request<Body>) -> Response {
        self.router.clone().oneshot(req).await.unwrap()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Sign up and return the `name=value` cookie pair.
    async fn signup(&self, email: &str) -> String {
        let resp = self
            .post(
                "/signup",
                &format!("name=Tester&email={}&password=password123", email),
                None,
            )
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        session_cookie(&resp)
    }

    /// Walk the whole wizard and confirm; returns the created reservation id.
    async fn book(&self, cookie: &str) -> i64 {
        let c = Some(cookie);
        self.post(
            "/locations",
            &format!(
                "location_id={}&start_date=2024-01-01&end_date=2024-01-04",
                self.location
            ),
            c,
        )
        .await;
        self.post("/cars", &format!("car_id={}", self.car), c).await;
        self.post("/insurance", &format!("insurance_id={}", self.insurance), c)
            .await;
        self.post(
            "/accessories",
            &format!("accessory_ids={}&accessory_ids={}", self.gps, self.seat),
            c,
        )
        .await;
        let resp = self.post("/payment", "", c).await;
        assert_eq!(redirect_target(&resp), "/reservations");

        let list = body_json(self.get("/reservations", c).await).await;
        list["data"]["reservations"][0]["id"].as_i64().unwrap()
    }
}

fn session_cookie(resp: &Response) -> String {
    let raw = resp.headers()[SET_COOKIE].to_str().unwrap();
    raw.split(';').next().unwrap().to_string()
}

fn redirect_target(resp: &Response) -> &str {
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    resp.headers()[LOCATION].to_str().unwrap()
}

async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn money(v: &Value) -> Decimal {
    Decimal::from_str(v.as_str().unwrap()).unwrap()
}

#[tokio::test]
async fn signup_sets_a_session_cookie() {
    let app = TestApp::new().await;
    let resp = app
        .post(
            "/signup",
            "name=Ada&email=ada%40example.com&password=password123",
            None,
        )
        .await;

    assert_eq!(redirect_target(&resp), "/locations");
    let raw = resp.headers()[SET_COOKIE].to_str().unwrap();
    assert!(raw.starts_with("car_rental_sid="));
    assert!(raw.contains("HttpOnly"));
    assert!(raw.contains("SameSite=Lax"));
    assert!(!raw.contains("Max-Age"));
}

#[tokio::test]
async fn full_booking_is_priced_and_listed() {
    let app = TestApp::new().await;
    let cookie = app.signup("renter@example.com").await;
    let c = Some(cookie.as_str());

    let resp = app
        .post(
            "/locations",
            &format!(
                "location_id={}&start_date=2024-01-01&end_date=2024-01-04",
                app.location
            ),
            c,
        )
        .await;
    assert_eq!(redirect_target(&resp), "/cars");

    let resp = app.post("/cars", &format!("car_id={}", app.car), c).await;
    assert_eq!(redirect_target(&resp), "/insurance");

    let resp = app
        .post("/insurance", &format!("insurance_id={}", app.insurance), c)
        .await;
    assert_eq!(redirect_target(&resp), "/accessories");

    let resp = app
        .post(
            "/accessories",
            &format!(
                "accessory_ids={}&accessory_ids=junk&accessory_ids={}",
                app.gps, app.seat
            ),
            c,
        )
        .await;
    assert_eq!(redirect_target(&resp), "/payment");

    let resp = app.get("/payment", c).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_json(resp).await;
    let quote = &page["data"]["quote"];
    assert_eq!(quote["days"], 3);
    assert_eq!(money(&quote["car_total"]), Decimal::new(15000, 2));
    assert_eq!(money(&quote["insurance_total"]), Decimal::new(3000, 2));
    assert_eq!(money(&quote["accessories_total"]), Decimal::new(1200, 2));
    assert_eq!(money(&quote["total_price"]), Decimal::new(19200, 2));
    assert_eq!(page["data"]["city"], "Berlin");
    assert_eq!(page["data"]["accessories"].as_array().unwrap().len(), 2);

    let resp = app.post("/payment", "", c).await;
    assert_eq!(redirect_target(&resp), "/reservations");

    let list = body_json(app.get("/reservations", c).await).await;
    let rows = list["data"]["reservations"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["car_model"], "Golf");
    assert_eq!(rows[0]["branch_name"], "Mitte");
    assert_eq!(money(&rows[0]["total_price"]), Decimal::new(19200, 2));

    // The draft is gone but the user is still logged in
    let resp = app.get("/cars", c).await;
    assert_eq!(redirect_target(&resp), "/locations");
}

#[tokio::test]
async fn payment_without_car_redirects_to_cars() {
    let app = TestApp::new().await;
    let cookie = app.signup("early@example.com").await;
    let c = Some(cookie.as_str());

    app.post(
        "/locations",
        &format!(
            "location_id={}&start_date=2024-03-01&end_date=2024-03-02",
            app.location
        ),
        c,
    )
    .await;

    assert_eq!(redirect_target(&app.get("/payment", c).await), "/cars");
    assert_eq!(redirect_target(&app.post("/payment", "", c).await), "/cars");
    assert_eq!(
        redirect_target(&app.post("/insurance", "insurance_id=", c).await),
        "/cars"
    );
}

#[tokio::test]
async fn wizard_without_draft_goes_back_to_locations() {
    let app = TestApp::new().await;
    let cookie = app.signup("nodraft@example.com").await;

    let resp = app.get("/cars", Some(&cookie)).await;
    assert_eq!(redirect_target(&resp), "/locations");
}

#[tokio::test]
async fn out_of_order_post_redirects_even_when_malformed() {
    let app = TestApp::new().await;
    let cookie = app.signup("early@example.com").await;
    let c = Some(cookie.as_str());

    for body in ["car_id=abc", "car_id=0", ""] {
        let resp = app.post("/cars", body, c).await;
        assert_eq!(redirect_target(&resp), "/locations", "{body:?}");
    }
    let resp = app.post("/insurance", "insurance_id=abc", c).await;
    assert_eq!(redirect_target(&resp), "/locations");

    app.post(
        "/locations",
        &format!(
            "location_id={}&start_date=2024-01-01&end_date=2024-01-02",
            app.location
        ),
        c,
    )
    .await;
    let resp = app.post("/insurance", "insurance_id=abc", c).await;
    assert_eq!(redirect_target(&resp), "/cars");
}

#[tokio::test]
async fn anonymous_requests_go_to_login() {
    let app = TestApp::new().await;

    for uri in ["/locations", "/cars", "/payment", "/reservations"] {
        assert_eq!(redirect_target(&app.get(uri, None).await), "/login");
    }
    assert_eq!(redirect_target(&app.get("/", None).await), "/login");

    let resp = app.get("/cars", Some("car_rental_sid=forged")).await;
    assert_eq!(redirect_target(&resp), "/login");
}

#[tokio::test]
async fn reversed_dates_are_rejected() {
    let app = TestApp::new().await;
    let cookie = app.signup("dates@example.com").await;

    let resp = app
        .post(
            "/locations",
            &format!(
                "location_id={}&start_date=2024-01-05&end_date=2024-01-01",
                app.location
            ),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_car_is_not_found() {
    let app = TestApp::new().await;
    let cookie = app.signup("ghost@example.com").await;
    let c = Some(cookie.as_str());

    app.post(
        "/locations",
        &format!(
            "location_id={}&start_date=2024-01-01&end_date=2024-01-02",
            app.location
        ),
        c,
    )
    .await;

    let resp = app.post("/cars", "car_id=9999", c).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // With a draft in place a malformed id is reported, not redirected
    let resp = app.post("/cars", "car_id=abc", c).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn duplicate_signup_and_bad_login() {
    let app = TestApp::new().await;
    app.signup("dup@example.com").await;

    let resp = app
        .post(
            "/signup",
            "name=Again&email=dup@example.com&password=password123",
            None,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Email already in use");

    let resp = app
        .post("/login", "email=dup@example.com&password=wrong-password", None)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Invalid email or password");

    let resp = app
        .post("/signup", "name=X&email=x@example.com&password=short", None)
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn login_issues_a_fresh_session() {
    let app = TestApp::new().await;
    let first = app.signup("fresh@example.com").await;

    let resp = app
        .post(
            "/login",
            "email=fresh@example.com&password=password123",
            Some(&first),
        )
        .await;
    assert_eq!(redirect_target(&resp), "/locations");
    let second = session_cookie(&resp);
    assert_ne!(first, second);

    assert_eq!(app.get("/locations", Some(&second)).await.status(), StatusCode::OK);
    assert_eq!(
        redirect_target(&app.get("/locations", Some(&first)).await),
        "/login"
    );
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::new().await;
    let cookie = app.signup("bye@example.com").await;

    let resp = app.get("/logout", Some(&cookie)).await;
    assert_eq!(redirect_target(&resp), "/login");
    assert!(resp.headers()[SET_COOKIE]
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));

    assert_eq!(
        redirect_target(&app.get("/locations", Some(&cookie)).await),
        "/login"
    );
}

#[tokio::test]
async fn reservations_are_private() {
    let app = TestApp::new().await;
    let owner = app.signup("owner@example.com").await;
    let stranger = app.signup("stranger@example.com").await;
    let id = app.book(&owner).await;

    let resp = app
        .get(&format!("/reservations/{}/edit", id), Some(&stranger))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .post(&format!("/reservations/{}/delete", id), "", Some(&stranger))
        .await;
    assert_eq!(redirect_target(&resp), "/reservations");

    let list = body_json(app.get("/reservations", Some(&stranger)).await).await;
    assert!(list["data"]["reservations"].as_array().unwrap().is_empty());

    let list = body_json(app.get("/reservations", Some(&owner)).await).await;
    assert_eq!(list["data"]["reservations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn editing_reprices_with_current_catalog() {
    let app = TestApp::new().await;
    let cookie = app.signup("editor@example.com").await;
    let c = Some(cookie.as_str());
    let id = app.book(&cookie).await;

    let form = body_json(app.get(&format!("/reservations/{}/edit", id), c).await).await;
    assert_eq!(form["data"]["location"]["city"], "Berlin");
    assert_eq!(
        form["data"]["selected_accessory_ids"],
        serde_json::json!([app.gps, app.seat])
    );

    fixtures::reprice_car(&app.db, app.car, Decimal::new(4000, 2)).await;

    // 2 days at 40.00, no insurance, GPS 5.00
    let resp = app
        .post(
            &format!("/reservations/{}/update", id),
            &format!(
                "car_id={}&insurance_id=&accessory_ids={}&start_date=2024-02-01&end_date=2024-02-03",
                app.car, app.gps
            ),
            c,
        )
        .await;
    assert_eq!(redirect_target(&resp), "/reservations");

    let list = body_json(app.get("/reservations", c).await).await;
    let row = &list["data"]["reservations"][0];
    assert_eq!(money(&row["total_price"]), Decimal::new(8500, 2));
    assert_eq!(row["days"], 2);
    assert_eq!(row["insurance_id"], Value::Null);
    assert_eq!(row["accessory_ids"], serde_json::json!([app.gps]));
}

#[tokio::test]
async fn update_rejects_reversed_dates() {
    let app = TestApp::new().await;
    let cookie = app.signup("reverse@example.com").await;
    let id = app.book(&cookie).await;

    let resp = app
        .post(
            &format!("/reservations/{}/update", id),
            &format!(
                "car_id={}&start_date=2024-02-03&end_date=2024-02-01",
                app.car
            ),
            Some(&cookie),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_removes_the_reservation() {
    let app = TestApp::new().await;
    let cookie = app.signup("deleter@example.com").await;
    let id = app.book(&cookie).await;

    let resp = app
        .post(&format!("/reservations/{}/delete", id), "", Some(&cookie))
        .await;
    assert_eq!(redirect_target(&resp), "/reservations");

    let list = body_json(app.get("/reservations", Some(&cookie)).await).await;
    assert!(list["data"]["reservations"].as_array().unwrap().is_empty());
    assert_eq!(
        app.get(&format!("/reservations/{}/edit", id), Some(&cookie))
            .await
            .status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn health_reports_database() {
    let app = TestApp::new().await;
    let resp = app.get("/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["database"]["status"], "ok");
}
