//! API Gateway handler for the todo resource
//!
//! `POST /todos` creates a todo; any other method reads the todo named by the `todoId`
//! path parameter. Every failure is answered with the same 500 envelope.

use aws_lambda_events::{
    apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse},
    encodings::Body,
};
use http::{
    header::{HeaderValue, CONTENT_TYPE},
    Method,
};
use serde::Serialize;
use tracing::{error, info};

use crate::todo::{Todo, TodoRecord, TodoService};
use crate::types::TodoError;

/// Path parameter carrying the todo id
pub const TODO_ID_PARAM: &str = "todoId";

/// Body returned when a todo was created
#[derive(Debug, Serialize)]
pub struct CreateTodoResponse {
    /// Generated todo id
    pub id: String,
    /// Always `Accepted`
    pub status: &'static str,
}

/// Body returned when a todo was read
#[derive(Debug, Serialize)]
pub struct ReadTodoResponse {
    /// Stored record
    pub todo: TodoRecord,
    /// Always `Processed`
    pub status: &'static str,
}

/// Body returned on any failure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `Internal Server Error`
    pub status: &'static str,
}

const INTERNAL_SERVER_ERROR: ErrorResponse = ErrorResponse {
    status: "Internal Server Error",
};

/// Routes an API Gateway proxy request to the todo service
pub async fn handle(
    service: &TodoService,
    request: ApiGatewayProxyRequest,
) -> ApiGatewayProxyResponse {
    if request.http_method == Method::POST {
        create(service, request.body.as_deref()).await
    } else {
        let id = request
            .path_parameters
            .get(TODO_ID_PARAM)
            .map(String::as_str)
            .unwrap_or_default();
        read(service, id).await
    }
}

async fn create(service: &TodoService, body: Option<&str>) -> ApiGatewayProxyResponse {
    let result = match Todo::from_body(body) {
        Ok(todo) => service.create(todo).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(id) => {
            info!(id = %id, "Todo accepted");
            json_response(
                202,
                &CreateTodoResponse {
                    id,
                    status: "Accepted",
                },
            )
        }
        Err(e) => failure_response("create", &e),
    }
}

async fn read(service: &TodoService, id: &str) -> ApiGatewayProxyResponse {
    match service.read(id).await {
        Ok(todo) => json_response(
            200,
            &ReadTodoResponse {
                todo,
                status: "Processed",
            },
        ),
        Err(e) => failure_response("read", &e),
    }
}

fn failure_response(operation: &str, err: &TodoError) -> ApiGatewayProxyResponse {
    error!(operation, kind = err.kind(), error = %err, "Todo request failed");
    json_response(500, &INTERNAL_SERVER_ERROR)
}

fn json_response<T: Serialize>(status_code: i64, body: &T) -> ApiGatewayProxyResponse {
    let (status_code, body) = match serde_json::to_string(body) {
        Ok(body) => (status_code, body),
        Err(e) => {
            error!(error = %e, "Failed to serialize response body");
            (500, r#"{"status":"Internal Server Error"}"#.to_string())
        }
    };

    let mut response = ApiGatewayProxyResponse::default();
    response.status_code = status_code;
    response
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response.body = Some(Body::Text(body));
    response
}
