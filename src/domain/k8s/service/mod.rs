pub mod diagnostic_service;
pub mod latency_observer;
pub mod namespace_service;
pub mod pod_delete_service;
pub mod pod_query_engine;
