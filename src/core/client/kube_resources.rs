/// Re-export the Kubernetes resource types used by the client layer
pub use k8s_openapi::api::core::v1::{Namespace, Pod};

pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
