#[cfg(test)]
mod integration_tests {
    use crate::handlers::favourites::{CreateFavouriteRequest, FavouriteResponse};
    use crate::router::create_router;
    use crate::schemas::{ApiResponse, AppState, ErrorResponse};
    use crate::test_utils::test_utils::{setup_test_app, setup_test_app_state, setup_test_db};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum_test::TestServer;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn test_server() -> TestServer {
        let app = setup_test_app().await;
        TestServer::new(app).unwrap()
    }

    async fn all_favourites(server: &TestServer) -> Vec<FavouriteResponse> {
        let response = server.get("/favourites").await;
        response.assert_status_ok();
        let body: ApiResponse<Vec<FavouriteResponse>> = response.json();
        body.results
    }

    fn assert_error(response: &axum_test::TestResponse, status: StatusCode, code: &str) {
        response.assert_status(status);
        let body: ErrorResponse = response.json();
        assert!(!body.success);
        assert_eq!(body.status, status.as_u16());
        assert_eq!(body.code, code);
        assert!(!body.error.is_empty());
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = test_server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_list_catalogue() {
        let server = test_server().await;

        let response = server.get("/characters").await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        assert!(body.success);
        assert_eq!(body.results.as_array().unwrap().len(), 5);

        let response = server.get("/planets").await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.results.as_array().unwrap().len(), 3);

        let response = server.get("/users").await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        let users = body.results.as_array().unwrap();
        assert_eq!(users.len(), 3);
        for user in users {
            assert!(user.get("password").is_none());
            assert_eq!(user["favourites"], serde_json::json!([]));
        }
    }

    #[tokio::test]
    async fn test_get_each_seeded_row_by_id() {
        let server = test_server().await;

        for id in 1..=5 {
            let response = server.get(&format!("/characters/{id}")).await;
            response.assert_status_ok();
            let body: ApiResponse<Value> = response.json();
            assert_eq!(body.results["id"], id);
        }

        for id in 1..=3 {
            let response = server.get(&format!("/planets/{id}")).await;
            response.assert_status_ok();
            let body: ApiResponse<Value> = response.json();
            assert_eq!(body.results["id"], id);

            let response = server.get(&format!("/user/{id}")).await;
            response.assert_status_ok();
            let body: ApiResponse<Value> = response.json();
            assert_eq!(body.results["id"], id);
        }

        let response = server.get("/characters/4").await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.results["name"], "Darth Vader");
    }

    #[tokio::test]
    async fn test_missing_rows_return_structured_not_found() {
        let server = test_server().await;

        for path in ["/characters/99", "/planets/99", "/user/99", "/favourites/99"] {
            let response = server.get(path).await;
            assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");
        }

        let response = server.get("/user/99/favourites").await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_non_integer_path_is_bad_request() {
        let server = test_server().await;

        let response = server.get("/characters/vader").await;
        assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");

        let response = server.post("/user/luke/favourites/people/4").await;
        assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_character_favourite_lifecycle() {
        let server = test_server().await;

        let response = server.post("/user/1/favourites/people/4").await;
        response.assert_status_ok();
        let first: ApiResponse<FavouriteResponse> = response.json();
        assert_eq!(first.message, "Favourite added");
        assert_eq!(first.results.user_id, 1);
        assert_eq!(first.results.characters_id, Some(4));
        assert_eq!(first.results.planets_id, None);

        // Repeating the request keeps a single row
        let response = server.post("/user/1/favourites/people/4").await;
        response.assert_status_ok();
        let second: ApiResponse<FavouriteResponse> = response.json();
        assert_eq!(second.message, "Favourite already exists");
        assert_eq!(second.results.id, first.results.id);

        let response = server.get("/user/1").await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        let favourites = body.results["favourites"].as_array().unwrap();
        assert_eq!(favourites.len(), 1);
        assert_eq!(favourites[0]["characters_id"], 4);
        assert_eq!(favourites[0]["planets_id"], Value::Null);

        let response = server.delete("/user/1/favourites/people/4").await;
        response.assert_status_ok();
        let body: ApiResponse<FavouriteResponse> = response.json();
        assert_eq!(body.message, "Favourite was removed");
        assert_eq!(body.results.id, first.results.id);

        let response = server.get("/user/1").await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.results["favourites"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_removing_absent_favourite_is_not_found() {
        let server = test_server().await;
        server.post("/user/1/favourites/planet/2").await.assert_status_ok();

        let response = server.delete("/user/1/favourites/people/4").await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");

        // Same numeric id, other kind
        let response = server.delete("/user/1/favourites/planet/4").await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");

        let favourites = all_favourites(&server).await;
        assert_eq!(favourites.len(), 1);
        assert_eq!(favourites[0].planets_id, Some(2));
    }

    #[tokio::test]
    async fn test_planet_favourites_listed_per_user() {
        let server = test_server().await;

        server.post("/user/2/favourites/planet/2").await.assert_status_ok();
        server.post("/user/2/favourites/planet/3").await.assert_status_ok();
        server.post("/user/2/favourites/people/5").await.assert_status_ok();
        server.post("/user/3/favourites/planet/1").await.assert_status_ok();

        let response = server.get("/user/2/favourites").await;
        response.assert_status_ok();
        let body: ApiResponse<Vec<FavouriteResponse>> = response.json();
        assert_eq!(body.results.len(), 3);
        assert!(body.results.iter().all(|f| f.user_id == 2));
        let planets: Vec<_> = body.results.iter().filter_map(|f| f.planets_id).collect();
        assert_eq!(planets, vec![2, 3]);

        let response = server.get("/user/1/favourites").await;
        let body: ApiResponse<Vec<FavouriteResponse>> = response.json();
        assert!(body.results.is_empty());
    }

    #[tokio::test]
    async fn test_favourite_requires_existing_user_and_target() {
        let server = test_server().await;

        let response = server.post("/user/99/favourites/people/4").await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");

        let response = server.post("/user/1/favourites/people/99").await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");

        let response = server.post("/user/1/favourites/planet/99").await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");

        assert!(all_favourites(&server).await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_only_that_row() {
        let server = test_server().await;

        server.post("/user/1/favourites/people/4").await.assert_status_ok();
        server.post("/user/1/favourites/planet/2").await.assert_status_ok();
        server.post("/user/2/favourites/people/4").await.assert_status_ok();

        server.delete("/user/1/favourites/people/4").await.assert_status_ok();

        let favourites = all_favourites(&server).await;
        assert_eq!(favourites.len(), 2);
        assert!(favourites
            .iter()
            .any(|f| f.user_id == 1 && f.planets_id == Some(2)));
        assert!(favourites
            .iter()
            .any(|f| f.user_id == 2 && f.characters_id == Some(4)));
    }

    #[tokio::test]
    async fn test_create_favourite_from_body() {
        let server = test_server().await;

        let request = CreateFavouriteRequest {
            user_id: Some(1),
            characters_id: None,
            planets_id: Some(3),
        };
        let response = server.post("/user/1").json(&request).await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<FavouriteResponse> = response.json();
        assert_eq!(body.message, "Favourite was successfully added");
        assert_eq!(body.results.user_id, 1);
        assert_eq!(body.results.planets_id, Some(3));

        // user_id may be omitted from the body
        let response = server
            .post("/user/1")
            .json(&serde_json::json!({ "characters_id": 2 }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server.post("/user/1").json(&request).await;
        assert_error(&response, StatusCode::CONFLICT, "CONFLICT");

        assert_eq!(all_favourites(&server).await.len(), 2);
    }

    #[tokio::test]
    async fn test_create_favourite_rejects_invalid_bodies() {
        let server = test_server().await;

        let bodies = [
            serde_json::json!({ "characters_id": 1, "planets_id": 1 }),
            serde_json::json!({}),
            serde_json::json!({ "user_id": 2, "characters_id": 1 }),
            serde_json::json!({ "characters_id": 0 }),
            serde_json::json!({ "characters_id": "one" }),
        ];
        for body in bodies {
            let response = server.post("/user/1").json(&body).await;
            assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
        }

        let response = server
            .post("/user/1")
            .bytes("{not json".into())
            .content_type("application/json")
            .await;
        assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");

        let response = server
            .post("/user/99")
            .json(&serde_json::json!({ "planets_id": 1 }))
            .await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");

        let response = server
            .post("/user/1")
            .json(&serde_json::json!({ "planets_id": 99 }))
            .await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");

        assert!(all_favourites(&server).await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_user_favourite_by_id_is_scoped_to_owner() {
        let server = test_server().await;

        let response = server.post("/user/1/favourites/people/1").await;
        let created: ApiResponse<FavouriteResponse> = response.json();
        let favourite_id = created.results.id;

        let response = server
            .delete(&format!("/user/2/favourites/{favourite_id}"))
            .await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");
        assert_eq!(all_favourites(&server).await.len(), 1);

        let response = server
            .delete(&format!("/user/1/favourites/{favourite_id}"))
            .await;
        response.assert_status_ok();
        let body: ApiResponse<FavouriteResponse> = response.json();
        assert_eq!(body.results.id, favourite_id);
        assert!(all_favourites(&server).await.is_empty());
    }

    #[tokio::test]
    async fn test_favourite_by_id_routes() {
        let server = test_server().await;

        let response = server.post("/user/3/favourites/planet/1").await;
        let created: ApiResponse<FavouriteResponse> = response.json();
        let favourite_id = created.results.id;

        let response = server.get(&format!("/favourites/{favourite_id}")).await;
        response.assert_status_ok();
        let body: ApiResponse<FavouriteResponse> = response.json();
        assert_eq!(body.results.user_id, 3);
        assert_eq!(body.results.planets_id, Some(1));

        server
            .delete(&format!("/favourites/{favourite_id}"))
            .await
            .assert_status_ok();

        let response = server.delete(&format!("/favourites/{favourite_id}")).await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_favourites_can_be_left_out_of_user_bodies() {
        let server = test_server().await;
        server.post("/user/1/favourites/people/3").await.assert_status_ok();

        let response = server.get("/user/1?favourites=false").await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        assert!(body.results.get("favourites").is_none());

        let response = server.get("/users?favourites=false").await;
        let body: ApiResponse<Value> = response.json();
        for user in body.results.as_array().unwrap() {
            assert!(user.get("favourites").is_none());
        }

        let response = server.get("/users?favourites=true").await;
        let body: ApiResponse<Value> = response.json();
        let luke = &body.results.as_array().unwrap()[0];
        assert_eq!(luke["favourites"].as_array().unwrap().len(), 1);

        let response = server.get("/users?favourites=maybe").await;
        assert_error(&response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_legacy_aliases() {
        let server = test_server().await;
        server.post("/user/2/favourites/planet/2").await.assert_status_ok();

        let response = server.get("/users/favourites").await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        let leia = body
            .results
            .as_array()
            .unwrap()
            .iter()
            .find(|u| u["id"] == 2)
            .unwrap();
        assert_eq!(leia["favourites"][0]["planets_id"], 2);

        let response = server.get("/user/favourites/2").await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.results["id"], 2);
        assert_eq!(body.results["favourites"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let server = test_server().await;

        let response = server.get("/api-docs/openapi.json").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["info"]["title"], "Holonet API");
    }

    #[tokio::test]
    async fn test_trailing_slash_reaches_same_route() {
        let server = test_server().await;

        let response = server.get("/users/").await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.results.as_array().unwrap().len(), 3);

        let response = server.get("/user/1/").await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.results["id"], 1);

        server
            .post("/user/1/favourites/people/4/")
            .await
            .assert_status_ok();
        assert_eq!(all_favourites(&server).await.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_route_and_method_return_error_body() {
        let server = test_server().await;

        let response = server.get("/nope").await;
        assert_error(&response, StatusCode::NOT_FOUND, "NOT_FOUND");

        let response = server.put("/users").await;
        assert_error(&response, StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED");

        let response = server.patch("/user/1/favourites/planet/2").await;
        assert_error(&response, StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED");
    }

    #[tokio::test]
    async fn test_empty_store_lists_empty_arrays() {
        let app = create_router(AppState {
            db: setup_test_db().await,
        });
        let server = TestServer::new(app).unwrap();

        for path in ["/users", "/characters", "/planets", "/favourites"] {
            let response = server.get(path).await;
            response.assert_status_ok();
            let body: ApiResponse<Value> = response.json();
            assert!(body.success);
            assert_eq!(body.results, serde_json::json!([]));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_targeted_creates_store_one_row() {
        let state = setup_test_app_state().await;
        let app = create_router(state.clone());

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let app = app.clone();
            tasks.push(tokio::spawn(async move {
                let request = Request::post("/user/1/favourites/people/4")
                    .body(Body::empty())
                    .unwrap();
                let response = app.oneshot(request).await.unwrap();
                let status = response.status();
                let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
                let body: ApiResponse<FavouriteResponse> = serde_json::from_slice(&bytes).unwrap();
                (status, body)
            }));
        }

        let mut added = 0;
        let mut ids = Vec::new();
        for task in tasks {
            let (status, body) = task.await.unwrap();
            assert_eq!(status, StatusCode::OK);
            if body.message == "Favourite added" {
                added += 1;
            }
            ids.push(body.results.id);
        }

        assert_eq!(added, 1);
        assert!(ids.iter().all(|id| *id == ids[0]));

        let server = TestServer::new(create_router(state)).unwrap();
        let favourites = all_favourites(&server).await;
        assert_eq!(favourites.len(), 1);
        assert_eq!(favourites[0].characters_id, Some(4));
    }

    #[tokio::test]
    async fn test_health_reports_unreachable_store() {
        let state = setup_test_app_state().await;
        let db = state.db.clone();
        let server = TestServer::new(create_router(state)).unwrap();

        db.close().await.unwrap();

        let response = server.get("/health").await;
        assert_error(&response, StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE");
    }
}
