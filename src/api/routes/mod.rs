//! API route declarations (e.g., /api/*)

pub mod k8s_routes;
pub mod network_routes;
pub mod system_routes;
