pub mod pod_page;
pub mod pod_query;
pub mod pod_record;
