//! Dynamic runtime values.

mod value;


pub use value::{ModuleDef, NativeFn, NativeFunction, Value};
