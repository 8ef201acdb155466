/// API Gateway proxy handler (create / read)
pub mod api;
/// Step Functions task handler (index an existing record)
pub mod indexer;
