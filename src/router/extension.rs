//! # Tabla de Extensiones
//! src/router/extension.rs
//!
//! Asocia cada extensión permitida con su tipo MIME. Las entradas con
//! intérprete (`py`, `php`) son ejecutables; el resto se sirven tal cual.
//!
//! Se compara la extensión completa (lo que sigue al último punto), no un
//! sufijo del path: `page.xhtml` no coincide con `html`. Como cada extensión
//! aparece una sola vez, el orden de la tabla no cambia el resultado.

use crate::cgi::Interpreter;

#[derive(Debug, PartialEq, Eq)]
pub struct ExtensionEntry {
    /// Extensión sin el punto (ej: "html")
    pub ext: &'static str,

    /// Valor de la cabecera Content-Type
    pub mime_type: &'static str,

    /// Intérprete si el archivo se ejecuta en lugar de servirse
    pub interpreter: Option<Interpreter>,
}

impl ExtensionEntry {
    const fn file(ext: &'static str, mime_type: &'static str) -> Self {
        Self {
            ext,
            mime_type,
            interpreter: None,
        }
    }

    const fn script(ext: &'static str, interpreter: Interpreter) -> Self {
        Self {
            ext,
            mime_type: "text/html",
            interpreter: Some(interpreter),
        }
    }

    pub fn is_executable(&self) -> bool {
        self.interpreter.is_some()
    }
}

pub static EXTENSIONS: &[ExtensionEntry] = &[
    ExtensionEntry::file("gif", "image/gif"),
    ExtensionEntry::file("jpg", "image/jpg"),
    ExtensionEntry::file("jpeg", "image/jpeg"),
    ExtensionEntry::file("png", "image/png"),
    ExtensionEntry::file("ico", "image/ico"),
    ExtensionEntry::file("zip", "image/zip"),
    ExtensionEntry::file("gz", "image/gz"),
    ExtensionEntry::file("tar", "image/tar"),
    ExtensionEntry::file("htm", "text/html"),
    ExtensionEntry::file("html", "text/html"),
    ExtensionEntry::file("txt", "text/plain"),
    ExtensionEntry::file("mpeg", "video/mpeg"),
    ExtensionEntry::file("mpg", "video/mpg"),
    ExtensionEntry::file("mp4", "video/mp4"),
    ExtensionEntry::file("doc", "application/msword"),
    ExtensionEntry::file("docx", "application/msword"),
    ExtensionEntry::file("pdf", "application/pdf"),
    ExtensionEntry::script("py", Interpreter::Python),
    ExtensionEntry::script("php", Interpreter::Php),
];

/// Busca la extensión de `path`, ignorando lo que haya tras el primer `?`
///
/// Retorna `None` si la extensión no está en la tabla.
///
/// # Ejemplo
/// ```
/// use cgi_server::router::extension::lookup;
///
/// assert_eq!(lookup("httpfiles/hello.py?name=world").unwrap().ext, "py");
/// assert!(lookup("httpfiles/run.sh").is_none());
/// ```
pub fn lookup(path: &str) -> Option<&'static ExtensionEntry> {
    let path = path.split('?').next().unwrap_or(path);
    let (stem, ext) = path.rsplit_once('.')?;

    // "httpfiles/.py" o "dir.d/file" no cuentan como extensión
    if stem.is_empty() || stem.ends_with('/') || ext.contains('/') {
        return None;
    }

    EXTENSIONS.iter().find(|entry| entry.ext == ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_lookup() {
        let entry = lookup("httpfiles/index.html").unwrap();
        assert_eq!(entry.mime_type, "text/html");
        assert!(!entry.is_executable());

        assert_eq!(lookup("a/b/photo.jpeg").unwrap().mime_type, "image/jpeg");
        assert_eq!(lookup("doc.pdf").unwrap().mime_type, "application/pdf");
    }

    #[test]
    fn test_script_lookup() {
        let py = lookup("httpfiles/hello.py").unwrap();
        assert_eq!(py.interpreter, Some(Interpreter::Python));
        assert!(py.is_executable());

        let php = lookup("httpfiles/index.php").unwrap();
        assert_eq!(php.interpreter, Some(Interpreter::Php));
    }

    #[test]
    fn test_query_is_ignored() {
        assert_eq!(lookup("hello.py?file=x.html").unwrap().ext, "py");
        assert_eq!(lookup("page.html?a=b.py").unwrap().ext, "html");
    }

    #[test]
    fn test_htm_and_html_are_distinct() {
        assert_eq!(lookup("a.htm").unwrap().ext, "htm");
        assert_eq!(lookup("a.html").unwrap().ext, "html");
    }

    #[test]
    fn test_unsupported_extensions() {
        assert!(lookup("httpfiles/script.sh").is_none());
        assert!(lookup("httpfiles/noext").is_none());
        assert!(lookup("httpfiles/").is_none());
        assert!(lookup("httpfiles/.html").is_none());
        assert!(lookup("dir.html/file").is_none());
        assert!(lookup("archive.tar.bz2").is_none());
    }

    #[test]
    fn test_no_dot_suffix_match() {
        // "xhtml" termina en "html" pero no es la misma extensión
        assert!(lookup("page.xhtml").is_none());
    }

    #[test]
    fn test_every_entry_is_reachable() {
        for entry in EXTENSIONS {
            let path = format!("file.{}", entry.ext);
            assert_eq!(lookup(&path), Some(entry));
        }
    }

    #[test]
    fn test_extensions_are_unique() {
        for (i, entry) in EXTENSIONS.iter().enumerate() {
            assert!(
                EXTENSIONS[i + 1..].iter().all(|other| other.ext != entry.ext),
                "duplicated extension {}",
                entry.ext
            );
        }
    }
}
