//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences. Paths in the vectors are
//! relative to the collection URL.

use serde_json::Value;
use todo_client::{
    ApiError, Category, HttpMethod, HttpRequest, HttpResponse, NewTodo, Priority, Statistics, Todo,
    TodoApi, TodoFilter, TodoId,
};

const BASE_URL: &str = "http://localhost:8080/api/todos";

fn api() -> TodoApi {
    TodoApi::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn case_id(case: &Value) -> TodoId {
    serde_json::from_value(case["input_id"].clone()).unwrap()
}

/// Method and URL always; headers and JSON body when the vector lists them.
fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(
        req.url,
        format!("{BASE_URL}{}", expected["path"].as_str().unwrap()),
        "{name}: url"
    );

    match expected.get("headers") {
        Some(headers) => {
            let expected_headers: Vec<(String, String)> = headers
                .as_array()
                .unwrap()
                .iter()
                .map(|h| {
                    let arr = h.as_array().unwrap();
                    (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
                })
                .collect();
            assert_eq!(req.headers, expected_headers, "{name}: headers");
        }
        None => assert!(req.headers.is_empty(), "{name}: headers should be empty"),
    }

    match expected.get("body") {
        Some(body) => {
            let req_body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn assert_expected_error(name: &str, err: ApiError, expected: &Value) {
    match expected.as_str().unwrap() {
        "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound"),
        "HttpError" => assert!(matches!(err, ApiError::HttpError { .. }), "{name}: expected HttpError"),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let api = api();
    for case in load(include_str!("../../test-vectors/list.json")) {
        let name = case["name"].as_str().unwrap();
        let f = &case["filter"];
        let filter = TodoFilter {
            search: f["search"].as_str().unwrap_or_default().to_string(),
            priority: f["priority"].as_str().map(|p| p.parse::<Priority>().unwrap()),
            category: f["category"].as_str().map(|c| c.parse::<Category>().unwrap()),
            completed: f["completed"].as_bool(),
        };

        let req = api.build_list_todos(&filter);
        assert_request(name, &req, &case["expected_request"]);

        let todos = api.parse_list_todos(simulated(&case)).unwrap();
        let expected: Vec<Todo> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(todos, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn create_test_vectors() {
    let api = api();
    for case in load(include_str!("../../test-vectors/create.json")) {
        let name = case["name"].as_str().unwrap();
        let input: NewTodo = serde_json::from_value(case["input"].clone()).unwrap();

        let req = api.build_create_todo(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let todo = api.parse_create_todo(simulated(&case)).unwrap();
        let expected: Todo = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(todo, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

#[test]
fn toggle_test_vectors() {
    let api = api();
    for case in load(include_str!("../../test-vectors/toggle.json")) {
        let name = case["name"].as_str().unwrap();

        let req = api.build_toggle_todo(&case_id(&case));
        assert_request(name, &req, &case["expected_request"]);

        let result = api.parse_toggle_todo(simulated(&case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_expected_error(name, result.unwrap_err(), expected_error);
        } else {
            let todo = result.unwrap();
            let expected: Todo = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(todo, expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Reorder
// ---------------------------------------------------------------------------

#[test]
fn reorder_test_vectors() {
    let api = api();
    for case in load(include_str!("../../test-vectors/reorder.json")) {
        let name = case["name"].as_str().unwrap();
        let ids: Vec<TodoId> = serde_json::from_value(case["input_ids"].clone()).unwrap();

        let req = api.build_reorder_todos(&ids).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = api.parse_reorder_todos(simulated(&case));
        match case.get("expected_error") {
            Some(expected_error) => assert_expected_error(name, result.unwrap_err(), expected_error),
            None => assert!(result.is_ok(), "{name}: expected success"),
        }
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_test_vectors() {
    let api = api();
    for case in load(include_str!("../../test-vectors/delete.json")) {
        let name = case["name"].as_str().unwrap();

        let (req, result) = if case.get("input_id").is_some() {
            let req = api.build_delete_todo(&case_id(&case));
            (req, api.parse_delete_todo(simulated(&case)))
        } else {
            let req = api.build_delete_completed();
            (req, api.parse_delete_completed(simulated(&case)))
        };
        assert_request(name, &req, &case["expected_request"]);

        match case.get("expected_error") {
            Some(expected_error) => assert_expected_error(name, result.unwrap_err(), expected_error),
            None => assert!(result.is_ok(), "{name}: expected success"),
        }
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[test]
fn statistics_test_vectors() {
    let api = api();
    for case in load(include_str!("../../test-vectors/statistics.json")) {
        let name = case["name"].as_str().unwrap();

        let req = api.build_statistics();
        assert_request(name, &req, &case["expected_request"]);

        let stats = api.parse_statistics(simulated(&case)).unwrap();
        let expected: Statistics = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(stats, expected, "{name}: parsed result");
    }
}
