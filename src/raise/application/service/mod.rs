pub mod convergence_service;
pub mod raise_service;
