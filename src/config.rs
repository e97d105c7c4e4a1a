//! # Configuración del Servidor
//! src/config.rs
//!
//! La configuración se construye una sola vez al arrancar y después es de
//! solo lectura: el servidor la comparte con todos los workers.
//!
//! Se aplica en capas: valores por defecto → `server.conf` → CLI/entorno.
//!
//! ## Ejemplos de uso
//!
//! ### server.conf
//! ```text
//! server_root = "httpfiles/"
//! server_signature = "Redes2Server"
//! max_clients = 10
//! listen_port = 8888
//! read_timeout = 10
//! ```
//!
//! ### CLI
//! ```bash
//! ./cgi_server --config server.conf --port 8080 --max-clients 32
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 SERVER_ROOT=/srv/www ./cgi_server
//! ```

use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Configuración inmutable del servidor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Raíz de los archivos servidos
    pub root_dir: String,

    /// Nombre que se envía en la cabecera `Server`
    pub server_name: String,

    /// Puerto de escucha
    pub port: u16,

    /// IP en la que escucha
    pub host: String,

    /// Máximo de conexiones atendidas a la vez
    pub max_clients: usize,

    /// Binario para los `.py`
    pub python_interpreter: String,

    /// Binario para los `.php`
    pub php_interpreter: String,

    /// Segundos que un worker espera a que llegue el request
    pub read_timeout_secs: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Claves de `server.conf`. Las ausentes mantienen su valor por defecto.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    server_root: Option<String>,
    server_signature: Option<String>,
    max_clients: Option<usize>,
    listen_port: Option<u16>,
    listen_host: Option<String>,
    python_interpreter: Option<String>,
    php_interpreter: Option<String>,
    read_timeout: Option<u64>,
}

/// Argumentos de línea de comandos
#[derive(Debug, Clone, Parser)]
#[command(name = "cgi_server")]
#[command(about = "Servidor HTTP/1.x concurrente con soporte para scripts py/php")]
#[command(version)]
pub struct Cli {
    /// Archivo de configuración
    #[arg(short, long, default_value = "server.conf", env = "SERVER_CONFIG")]
    pub config: PathBuf,

    /// Puerto en el que escucha el servidor
    #[arg(short, long, env = "HTTP_PORT")]
    pub port: Option<u16>,

    /// Host/IP en el que escucha
    #[arg(long, env = "HTTP_HOST")]
    pub host: Option<String>,

    /// Directorio raíz de los archivos
    #[arg(short, long, env = "SERVER_ROOT")]
    pub root: Option<String>,

    /// Nombre del servidor (cabecera Server)
    #[arg(short, long, env = "SERVER_NAME")]
    pub name: Option<String>,

    /// Máximo de clientes simultáneos
    #[arg(long = "max-clients", env = "MAX_CLIENTS")]
    pub max_clients: Option<usize>,

    /// Intérprete de Python
    #[arg(long = "python", env = "PYTHON_INTERPRETER")]
    pub python_interpreter: Option<String>,

    /// Intérprete de PHP
    #[arg(long = "php", env = "PHP_INTERPRETER")]
    pub php_interpreter: Option<String>,

    /// Segundos de espera por el request antes de responder 400
    #[arg(long = "read-timeout", env = "READ_TIMEOUT")]
    pub read_timeout: Option<u64>,
}

impl ServerConfig {
    /// Lee `server.conf` sobre los valores por defecto
    ///
    /// Si el archivo no existe se usan los valores por defecto.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("{} no existe, usando configuración por defecto", path.display());
                return Ok(config);
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let file: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.apply_file(file);

        Ok(config)
    }

    /// Construye la configuración final: defaults → archivo → CLI/entorno
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(&cli.config)?;
        config.apply_cli(cli);
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(root) = file.server_root {
            self.root_dir = root;
        }
        if let Some(name) = file.server_signature {
            self.server_name = name;
        }
        if let Some(max_clients) = file.max_clients {
            self.max_clients = max_clients;
        }
        if let Some(port) = file.listen_port {
            self.port = port;
        }
        if let Some(host) = file.listen_host {
            self.host = host;
        }
        if let Some(python) = file.python_interpreter {
            self.python_interpreter = python;
        }
        if let Some(php) = file.php_interpreter {
            self.php_interpreter = php;
        }
        if let Some(secs) = file.read_timeout {
            self.read_timeout_secs = secs;
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(root) = &cli.root {
            self.root_dir = root.clone();
        }
        if let Some(name) = &cli.name {
            self.server_name = name.clone();
        }
        if let Some(max_clients) = cli.max_clients {
            self.max_clients = max_clients;
        }
        if let Some(python) = &cli.python_interpreter {
            self.python_interpreter = python.clone();
        }
        if let Some(php) = &cli.php_interpreter {
            self.php_interpreter = php.clone();
        }
        if let Some(secs) = cli.read_timeout {
            self.read_timeout_secs = secs;
        }
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use cgi_server::config::ServerConfig;
    ///
    /// let config = ServerConfig::default();
    /// assert_eq!(config.address(), "0.0.0.0:8888");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Tiempo máximo de espera por los bytes del request
    ///
    /// Sin él, un cliente que conecta y no envía nada retiene su hueco de
    /// `max_clients` para siempre.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.max_clients == 0 {
            return Err("max_clients must be >= 1".to_string());
        }
        if self.read_timeout_secs == 0 {
            return Err("read_timeout must be >= 1".to_string());
        }
        if self.root_dir.is_empty() {
            return Err("server_root must not be empty".to_string());
        }
        if self.server_name.is_empty() {
            return Err("server_signature must not be empty".to_string());
        }
        if self.python_interpreter.is_empty() || self.php_interpreter.is_empty() {
            return Err("interpreters must not be empty".to_string());
        }
        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn print_summary(&self) {
        info!(
            name = %self.server_name,
            address = %self.address(),
            root = %self.root_dir,
            max_clients = self.max_clients,
            python = %self.python_interpreter,
            php = %self.php_interpreter,
            read_timeout = self.read_timeout_secs,
            "configuración cargada"
        );
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root_dir: "httpfiles/".to_string(),
            server_name: "Redes2Server".to_string(),
            port: 8888,
            host: "0.0.0.0".to_string(),
            max_clients: 10,
            python_interpreter: "python3".to_string(),
            php_interpreter: "php".to_string(),
            read_timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_conf(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["cgi_server"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    /// `Cli` sin overrides, independiente de las variables de entorno
    fn cli_with_config(path: &Path) -> Cli {
        Cli {
            config: path.to_path_buf(),
            port: None,
            host: None,
            root: None,
            name: None,
            max_clients: None,
            python_interpreter: None,
            php_interpreter: None,
            read_timeout: None,
        }
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.root_dir, "httpfiles/");
        assert_eq!(config.server_name, "Redes2Server");
        assert_eq!(config.port, 8888);
        assert_eq!(config.max_clients, 10);
        assert_eq!(config.read_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_address_custom() {
        let mut config = ServerConfig::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    // ==================== Validación ====================

    #[test]
    fn test_validate_success() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_clients() {
        let mut config = ServerConfig::default();
        config.max_clients = 0;
        let result = config.validate();
        assert!(result.unwrap_err().contains("max_clients"));
    }

    #[test]
    fn test_validate_empty_root() {
        let mut config = ServerConfig::default();
        config.root_dir = String::new();
        assert!(config.validate().unwrap_err().contains("server_root"));
    }

    #[test]
    fn test_validate_zero_read_timeout() {
        let mut config = ServerConfig::default();
        config.read_timeout_secs = 0;
        assert!(config.validate().unwrap_err().contains("read_timeout"));
    }

    // ==================== server.conf ====================

    #[test]
    fn test_from_file_overrides_defaults() {
        let file = write_conf(
            "server_root = \"/srv/www/\"\nserver_signature = \"Test\"\nmax_clients = 3\nlisten_port = 9090\n",
        );
        let config = ServerConfig::from_file(file.path()).unwrap();

        assert_eq!(config.root_dir, "/srv/www/");
        assert_eq!(config.server_name, "Test");
        assert_eq!(config.max_clients, 3);
        assert_eq!(config.port, 9090);
        assert_eq!(config.php_interpreter, "php");
    }

    #[test]
    fn test_from_file_partial() {
        let file = write_conf("listen_port = 1234\nread_timeout = 3\n");
        let config = ServerConfig::from_file(file.path()).unwrap();

        assert_eq!(config.port, 1234);
        assert_eq!(config.read_timeout_secs, 3);
        assert_eq!(config.root_dir, "httpfiles/");
    }

    #[test]
    fn test_from_file_missing_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::from_file(&dir.path().join("nope.conf")).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_from_file_malformed() {
        let file = write_conf("listen_port = \"not a number\"\n");
        let result = ServerConfig::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_from_file_unknown_key() {
        let file = write_conf("listen_prot = 80\n");
        assert!(ServerConfig::from_file(file.path()).is_err());
    }

    // ==================== CLI ====================

    #[test]
    fn test_cli_parses_every_flag() {
        let cli = cli(&[
            "--config", "other.conf", "--port", "7070", "--host", "127.0.0.1",
            "--root", "/tmp/www/", "--name", "Cli", "--max-clients", "2",
            "--python", "py3", "--php", "php8", "--read-timeout", "5",
        ]);

        assert_eq!(cli.config, PathBuf::from("other.conf"));
        assert_eq!(cli.port, Some(7070));
        assert_eq!(cli.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(cli.root.as_deref(), Some("/tmp/www/"));
        assert_eq!(cli.name.as_deref(), Some("Cli"));
        assert_eq!(cli.max_clients, Some(2));
        assert_eq!(cli.python_interpreter.as_deref(), Some("py3"));
        assert_eq!(cli.php_interpreter.as_deref(), Some("php8"));
        assert_eq!(cli.read_timeout, Some(5));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = write_conf("listen_port = 9090\nmax_clients = 3\n");
        let cli = Cli {
            port: Some(7070),
            root: Some("/tmp/www/".to_string()),
            ..cli_with_config(file.path())
        };

        let config = ServerConfig::load(&cli).unwrap();
        assert_eq!(config.port, 7070);
        assert_eq!(config.max_clients, 3);
        assert_eq!(config.root_dir, "/tmp/www/");
    }

    #[test]
    fn test_load_rejects_invalid() {
        let file = write_conf("max_clients = 0\n");

        let result = ServerConfig::load(&cli_with_config(file.path()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_config_print_summary() {
        // No debe entrar en pánico sin subscriber instalado
        ServerConfig::default().print_summary();
    }
}
