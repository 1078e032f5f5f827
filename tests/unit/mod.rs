mod chain_property_tests;
mod dataset_pipeline_tests;
