// Module layout (Clean Architecture style)
// - bootstrap: configuration and service wiring
// - infrastructure: Postgres repositories and blob storage adapters
// - presentation: HTTP handlers and routing
// - application: ports, access policies and use cases
// - domain: core models and choice enums

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
