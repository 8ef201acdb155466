use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use todo_api::{
    bootstrap::{init_tracing, todo_service},
    handlers::indexer::{self, IndexRequest},
    types::{Environment, TodoConfig},
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env()?;
    init_tracing(environment);

    let config = TodoConfig::from_env()?;
    let service = Arc::new(todo_service(environment, &config).await);

    info!("Todo indexer starting");

    run(service_fn(|event: LambdaEvent<IndexRequest>| {
        let service = service.clone();
        async move {
            let (request, context) = event.into_parts();
            info!(
                request_id = %context.request_id,
                key = %request.key,
                "Indexing todo"
            );
            indexer::handle(&service, request).await.map_err(Error::from)
        }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}
