pub mod k8s;
pub mod network;
pub mod system;
