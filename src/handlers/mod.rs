//! HTTP handlers, one module per resource. Each handler runs its guards in order
//! (existence, ownership or role, body shape) before touching the repository.

pub mod children;
pub mod class_instances;
pub mod courses;
pub mod parents;
pub mod profiles;
