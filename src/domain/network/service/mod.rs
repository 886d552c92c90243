pub mod http_request_service;
pub mod network_check_service;
