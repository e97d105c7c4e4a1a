//! # Puente con el intérprete
//! src/cgi/bridge.rs
//!
//! Lanza el intérprete como proceso hijo con stdin y stdout conectados a
//! pipes y recoge todo lo que escribe.
//!
//! ## Orden de operaciones
//!
//! ```text
//! spawn → escribir args + "\n" en stdin → cerrar stdin
//!       → leer stdout hasta EOF → wait()
//! ```
//!
//! Se vacía stdout antes de esperar al hijo: si se esperase primero, un
//! script que escriba más de lo que cabe en el pipe quedaría bloqueado
//! para siempre. Nunca se lee mientras se escribe.

use std::io::{self, Read, Write};
use std::process::{Child, Command, Stdio};
use thiserror::Error;
use tracing::{debug, warn};

/// Marca que se añade al final de la salida del script
pub const OUTPUT_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Intérpretes soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpreter {
    /// `python3 <path> <args>`
    Python,

    /// `php -f <path> <args>`
    Php,
}

impl Interpreter {
    /// Construye la invocación con el binario `program` para este intérprete
    pub fn invocation(self, program: &str, script: &str, args: &str) -> ScriptInvocation {
        let mut argv = Vec::with_capacity(3);
        if self == Interpreter::Php {
            argv.push("-f".to_string());
        }
        argv.push(script.to_string());
        argv.push(args.to_string());

        ScriptInvocation {
            interpreter: program.to_string(),
            argv,
            stdin_payload: args.to_string(),
        }
    }
}

/// Una ejecución concreta de un script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptInvocation {
    /// Programa a ejecutar (se busca en el PATH)
    pub interpreter: String,

    /// Argumentos tras el nombre del programa
    pub argv: Vec<String>,

    /// Lo que se escribe en stdin antes del `\n` final
    pub stdin_payload: String,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write script stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("failed to read script stdout: {0}")]
    Stdout(#[source] io::Error),

    #[error("failed to wait for script: {0}")]
    Wait(#[source] io::Error),
}

impl ScriptInvocation {
    /// Ejecuta el script y devuelve su salida terminada en `\r\n\r\n`
    ///
    /// El estado de salida del hijo no se interpreta: si el script falla,
    /// se devuelve lo que haya llegado a escribir (posiblemente nada).
    /// El hijo siempre se ha esperado cuando esta función retorna.
    pub fn run(&self) -> Result<Vec<u8>, ScriptError> {
        let mut child = Command::new(&self.interpreter)
            .args(&self.argv)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| ScriptError::Spawn {
                program: self.interpreter.clone(),
                source,
            })?;

        debug!(program = %self.interpreter, pid = child.id(), "script lanzado");

        if let Err(e) = self.feed_stdin(&mut child) {
            kill_and_reap(&mut child);
            return Err(ScriptError::Stdin(e));
        }

        let mut output = Vec::new();
        if let Some(mut stdout) = child.stdout.take() {
            if let Err(e) = stdout.read_to_end(&mut output) {
                kill_and_reap(&mut child);
                return Err(ScriptError::Stdout(e));
            }
        }

        let status = child.wait().map_err(ScriptError::Wait)?;
        if !status.success() {
            warn!(program = %self.interpreter, %status, "el script terminó con error");
        }

        output.extend_from_slice(OUTPUT_TERMINATOR);
        Ok(output)
    }

    /// Escribe el payload y cierra stdin (al soltar el handle)
    fn feed_stdin(&self, child: &mut Child) -> io::Result<()> {
        let Some(mut stdin) = child.stdin.take() else {
            return Ok(());
        };

        let result = stdin
            .write_all(self.stdin_payload.as_bytes())
            .and_then(|_| stdin.write_all(b"\n"));

        match result {
            // El hijo terminó sin leer stdin
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                debug!(program = %self.interpreter, "el script no leyó stdin");
                Ok(())
            }
            other => other,
        }
    }
}

/// Mata y espera al hijo, ignorando errores
fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    if let Err(e) = child.wait() {
        warn!(pid = child.id(), "no se pudo esperar al script: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str, payload: &str) -> ScriptInvocation {
        ScriptInvocation {
            interpreter: "sh".to_string(),
            argv: vec!["-c".to_string(), script.to_string()],
            stdin_payload: payload.to_string(),
        }
    }

    // ==================== Invocaciones ====================

    #[test]
    fn test_python_invocation() {
        let inv = Interpreter::Python.invocation("python3", "/srv/hello.py", "name=world");

        assert_eq!(inv.interpreter, "python3");
        assert_eq!(inv.argv, ["/srv/hello.py", "name=world"]);
        assert_eq!(inv.stdin_payload, "name=world");
    }

    #[test]
    fn test_php_invocation() {
        let inv = Interpreter::Php.invocation("php", "/srv/index.php", "");

        assert_eq!(inv.interpreter, "php");
        assert_eq!(inv.argv, ["-f", "/srv/index.php", ""]);
        assert_eq!(inv.stdin_payload, "");
    }

    // ==================== Ejecución ====================

    #[test]
    fn test_stdin_is_echoed_with_newline() {
        let output = sh("cat", "hola mundo").run().unwrap();
        assert_eq!(output, b"hola mundo\n\r\n\r\n");
    }

    #[test]
    fn test_output_without_reading_stdin() {
        let output = sh("printf 'Hello world'", "ignored").run().unwrap();
        assert_eq!(output, b"Hello world\r\n\r\n");
    }

    #[test]
    fn test_failing_script_returns_partial_output() {
        let output = sh("printf partial; exit 3", "").run().unwrap();
        assert_eq!(output, b"partial\r\n\r\n");
    }

    #[test]
    fn test_empty_output() {
        let output = sh("true", "").run().unwrap();
        assert_eq!(output, OUTPUT_TERMINATOR);
    }

    #[test]
    fn test_large_output_does_not_deadlock() {
        // Bastante más que la capacidad típica de un pipe (64 KiB)
        let output = sh("head -c 300000 /dev/zero", "").run().unwrap();
        assert_eq!(output.len(), 300_000 + OUTPUT_TERMINATOR.len());
    }

    #[test]
    fn test_missing_interpreter() {
        let inv = ScriptInvocation {
            interpreter: "definitely-not-an-interpreter-xyz".to_string(),
            argv: Vec::new(),
            stdin_payload: String::new(),
        };

        assert!(matches!(inv.run(), Err(ScriptError::Spawn { .. })));
    }
}
