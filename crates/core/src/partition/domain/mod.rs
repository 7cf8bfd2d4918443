pub mod partition_plan;
