// Terragen - research-grounded Terraform generation
// Library exports

// Core modules
pub mod completion;
pub mod config;
pub mod search;
pub mod workflow;
