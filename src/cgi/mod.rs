//! # Ejecución de Scripts
//!
//! Los archivos `.py` y `.php` no se sirven: se ejecutan con su intérprete
//! y lo que escriben en stdout se convierte en el body de la respuesta.
//!
//! - `bridge`: proceso hijo + pipes

pub mod bridge;

pub use bridge::{Interpreter, ScriptError, ScriptInvocation, OUTPUT_TERMINATOR};
