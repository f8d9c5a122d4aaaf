pub mod generator_service;
pub mod parser_service;
pub mod randomization_service;
pub mod scoring_service;
pub mod validation_service;
