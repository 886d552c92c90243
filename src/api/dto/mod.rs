//! Request and response bodies of the HTTP API

pub mod k8s_info_dto;
pub mod k8s_pod_delete_dto;
pub mod k8s_pod_query_request_dto;
pub mod network_dto;
pub mod paginated_response;
pub mod system_dto;
