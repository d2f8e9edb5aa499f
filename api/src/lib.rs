// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup
// - infrastructure: Postgres/in-memory stores and token generation
// - presentation: HTTP handlers, envelope and routing
// - application: ports, use cases and input validation
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
