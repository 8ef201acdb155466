use std::sync::Arc;

use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use todo_api::{
    bootstrap::{init_tracing, todo_service},
    handlers::api,
    types::{Environment, TodoConfig},
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env()?;
    init_tracing(environment);

    let config = TodoConfig::from_env()?;
    let service = Arc::new(todo_service(environment, &config).await);

    info!("Todo API handler starting");

    run(service_fn(|event: LambdaEvent<ApiGatewayProxyRequest>| {
        let service = service.clone();
        async move {
            let (request, context) = event.into_parts();
            info!(
                request_id = %context.request_id,
                method = %request.http_method,
                "Processing todo request"
            );
            Ok::<_, Error>(api::handle(&service, request).await)
        }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}
