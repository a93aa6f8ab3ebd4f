//! Driver bindings implementing the passo-core backend traits.

pub mod mysql;
