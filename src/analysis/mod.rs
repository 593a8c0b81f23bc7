pub mod objective_sensitivity;

pub use objective_sensitivity::ObjectiveSensitivityAnalyser;
