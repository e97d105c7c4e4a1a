//! # GET, POST, HEAD y OPTIONS
//! src/handlers/methods.rs
//!
//! - GET: sirve el archivo o ejecuta el script con la query como argumento
//! - POST: ejecuta el script con `body + " " + query`; los estáticos no se tocan
//! - HEAD: cabeceras de GET sin body
//! - OPTIONS: lista de métodos permitidos

use super::{static_file, RequestContext};
use crate::cgi::Interpreter;
use crate::error::HttpError;
use crate::http::Response;
use crate::router::ExtensionEntry;
use tracing::info;

const HTML_START: &[u8] = b"<html><body>";
const HTML_END: &[u8] = b"</body></html>\n";

/// Body fijo para POST sobre archivos estáticos
const POST_STATIC_BODY: &str = "POST_METHOD";

const ALLOWED_METHODS: &str = "OPTIONS, GET, POST, HEAD";

pub fn get_handler(ctx: &RequestContext<'_>) -> Result<Response, HttpError> {
    let extension = ctx.extension()?;

    if extension.is_executable() {
        let query = &ctx.target.query_string;
        info!(script = %ctx.target.absolute_path, args = %query, "GET de script");

        let body = run_script(ctx, extension, query)?;

        // La salida se genera ahora: Last-Modified es la fecha actual
        return Ok(ctx
            .ok_response(extension.mime_type)
            .with_header("Last-Modified", &ctx.date)
            .with_body_bytes(body));
    }

    let file = static_file::open(&ctx.target.absolute_path)?;

    Ok(ctx
        .ok_response(extension.mime_type)
        .with_header("Last-Modified", &file.last_modified)
        .with_file(file.file, file.len))
}

pub fn post_handler(ctx: &RequestContext<'_>) -> Result<Response, HttpError> {
    let extension = ctx.extension()?;

    if !extension.is_executable() {
        return Ok(ctx
            .ok_response(extension.mime_type)
            .with_body(POST_STATIC_BODY));
    }

    let args = format!(
        "{} {}",
        String::from_utf8_lossy(ctx.body),
        ctx.target.query_string
    );
    info!(script = %ctx.target.absolute_path, args = %args, "POST de script");

    let body = run_script(ctx, extension, &args)?;

    Ok(ctx.ok_response(extension.mime_type).with_body_bytes(body))
}

pub fn head_handler(ctx: &RequestContext<'_>) -> Result<Response, HttpError> {
    let extension = ctx.extension()?;
    let file = static_file::open(&ctx.target.absolute_path)?;

    Ok(ctx
        .ok_response(extension.mime_type)
        .with_header("Last-Modified", &file.last_modified)
        .with_content_length(file.len))
}

pub fn options_handler(ctx: &RequestContext<'_>) -> Result<Response, HttpError> {
    let content_type = ctx
        .target
        .extension
        .map(|entry| entry.mime_type)
        .unwrap_or("text/html");

    let mut response = ctx.ok_response(content_type);
    response.add_header("Allow", ALLOWED_METHODS);
    Ok(response)
}

/// Comprueba que el script existe, lo ejecuta y envuelve su salida en HTML
fn run_script(
    ctx: &RequestContext<'_>,
    extension: &ExtensionEntry,
    args: &str,
) -> Result<Vec<u8>, HttpError> {
    let script = &ctx.target.absolute_path;
    static_file::ensure_exists(script)?;

    let interpreter = extension
        .interpreter
        .ok_or_else(|| HttpError::Internal(format!("{} is not executable", script)))?;
    let program = match interpreter {
        Interpreter::Python => &ctx.config.python_interpreter,
        Interpreter::Php => &ctx.config.php_interpreter,
    };

    let output = interpreter.invocation(program, script, args).run()?;

    let mut body = Vec::with_capacity(HTML_START.len() + output.len() + HTML_END.len());
    body.extend_from_slice(HTML_START);
    body.extend_from_slice(&output);
    body.extend_from_slice(HTML_END);
    Ok(body)
}
